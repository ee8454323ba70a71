// Desktop front end for the mask editor.
// • Left drag paints the mask, right drag (or Shift) erases.
// • Mouse wheel changes the brush radius.
// • E exports mask + image payloads, C clears the mask, I inverts it. ESC quits.

mod window;

use clap::Parser;
use log::{error, info};
use mask_editor::{
    BlendMode, EditorCallbacks, EditorConfig, Error, ExportPayload, MaskEditor, PointerEvent,
    Size, WheelEvent,
};
use minifb::Key;
use std::path::{Path, PathBuf};
use window::Drawer;

#[derive(Parser, Debug)]
#[command(name = "mask-editor", about = "Paint a binary mask over an image")]
struct Args {
    /// Image path, http(s) URL or data URL
    source: String,

    /// Container size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    container: Option<Size>,

    /// Brush radius in pixels
    #[arg(long)]
    cursor_size: Option<f32>,

    /// Mask color as #rrggbb
    #[arg(long)]
    mask_color: Option<String>,

    /// Mask layer opacity (0..1)
    #[arg(long)]
    mask_opacity: Option<f32>,

    /// CSS blend mode of the mask layer
    #[arg(long, value_parser = |s: &str| s.parse::<BlendMode>())]
    blend_mode: Option<BlendMode>,

    /// JSON config file (camelCase keys); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write mask.json / image.json here instead of printing them
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let dim = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Size::new(dim(w)?, dim(h)?))
}

fn build_config(args: &Args) -> Result<EditorConfig, Error> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    if let Some(size) = args.container {
        config.container_width = size.x;
        config.container_height = size.y;
    }
    if let Some(r) = args.cursor_size {
        config.cursor_size = r;
    }
    if let Some(color) = &args.mask_color {
        config.mask_color = color.clone();
    }
    if let Some(opacity) = args.mask_opacity {
        config.mask_opacity = opacity;
    }
    if let Some(mode) = args.blend_mode {
        config.mask_blend_mode = mode;
    }
    Ok(config)
}

fn emit(payload: &ExportPayload, out: Option<&Path>, file: &str) -> Result<(), Error> {
    let json = payload.to_json()?;
    match out {
        Some(dir) => {
            let path = dir.join(file);
            std::fs::write(&path, json)
                .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
            info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = build_config(&args)?;

    let callbacks = EditorCallbacks::default()
        .on_cursor_size_change(|r| info!("brush radius {r}"))
        .on_image_load_failed(|e| error!("{e}"));
    let mut editor = MaskEditor::new(&config, callbacks)?;

    /* --- Source image ---
       Visual: on success the image appears fitted top-left in the window.
       A failed load is already reported by the callback; the window still
       opens (empty) and stays in Loading, nothing is retried. */
    if editor.load(&args.source).is_err() {
        info!("no image to edit, editor is {:?}", editor.state());
    }

    /* --- Window sized to the container ---
       Visual: dark letterbox around the fitted image. */
    let mut drawer = Drawer::new("Mask Editor", editor.container())?;
    let mut last_input = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Keys
           Visual: C wipes the overlay, I swaps painted/unpainted, E prints payloads. */
        if drawer.pressed_once(Key::C) {
            editor.clear_mask();
        }
        if drawer.pressed_once(Key::I) {
            editor.invert_mask()?;
        }
        if drawer.pressed_once(Key::E) {
            match editor.export() {
                Ok(exported) => {
                    emit(&exported.mask, args.out.as_deref(), "mask.json")?;
                    emit(&exported.image, args.out.as_deref(), "image.json")?;
                }
                Err(e) => error!("export failed: {e}"),
            }
        }

        /* 2) Pointer: paint / erase / resize brush
           Visual: the brush ring follows the mouse; holding a button fills the mask. */
        if let Some(position) = drawer.mouse_pos() {
            let event = PointerEvent { position, buttons: drawer.buttons(), shift: drawer.shift_down() };
            // only react to actual movement or button changes, like a mousemove listener
            if last_input != Some(event) {
                editor.pointer_move(event);
                last_input = Some(event);
            }
            if let Some(delta_y) = drawer.scroll_down() {
                editor.wheel(WheelEvent { position, delta_y });
            }
        }

        /* 3) Present base + mask + cursor (this is when the screen updates). */
        drawer.present(editor.composite().as_ref())?;
    }

    Ok(())
}
