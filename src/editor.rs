//! The mask editor surface: loads the source image, fits it into the
//! container, routes pointer and wheel input to the brush and exports the
//! mask and base image as host payloads.
//!
//! State machine: `Unloaded -> Loading -> Fitted`, and back to `Loading`
//! whenever the source changes or the container is re-measured.

use crate::blend::BlendMode;
use crate::brush::{BrushEngine, PointerEvent, Stroke, WheelEvent, WheelOutcome};
use crate::color::hex_to_rgb;
use crate::compositor::Compositor;
use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::loader::{fetch_image, ImageSource};
use crate::serialize::{to_data_url, to_file_payload, to_mask, ExportPayload};
use crate::types::Size;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Unloaded,
    Loading,
    Fitted,
}

/// Identifies one load request; only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Both payloads produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub mask: ExportPayload,
    pub image: ExportPayload,
}

/// Outbound notifications to the host. Wheel resizing is only enabled when
/// `on_cursor_size_change` is set.
#[derive(Default)]
pub struct EditorCallbacks {
    pub on_cursor_size_change: Option<Box<dyn FnMut(f32)>>,
    pub on_image_load_failed: Option<Box<dyn FnMut(&Error)>>,
    pub on_export: Option<Box<dyn FnMut(&Exported)>>,
}

impl EditorCallbacks {
    pub fn on_cursor_size_change(mut self, f: impl FnMut(f32) + 'static) -> Self {
        self.on_cursor_size_change = Some(Box::new(f));
        self
    }

    pub fn on_image_load_failed(mut self, f: impl FnMut(&Error) + 'static) -> Self {
        self.on_image_load_failed = Some(Box::new(f));
        self
    }

    pub fn on_export(mut self, f: impl FnMut(&Exported) + 'static) -> Self {
        self.on_export = Some(Box::new(f));
        self
    }
}

/// Largest size with the image's aspect ratio that fits in `container`.
pub fn fit_size(image: (u32, u32), container: Size) -> Size {
    let (iw, ih) = (image.0.max(1) as f64, image.1.max(1) as f64);
    let scale = (container.x as f64 / iw).min(container.y as f64 / ih);
    Size::new(
        ((iw * scale).floor() as u32).max(1),
        ((ih * scale).floor() as u32).max(1),
    )
}

pub struct MaskEditor {
    compositor: Compositor,
    brush: BrushEngine,
    callbacks: EditorCallbacks,
    state: EditorState,
    container: Size,
    source: Option<ImageSource>,
    image: Option<RgbaImage>,
    last_ticket: u64,
    pending: Option<LoadTicket>,
    last_error: Option<Error>,
}

impl MaskEditor {
    pub fn new(config: &EditorConfig, callbacks: EditorCallbacks) -> Result<Self> {
        let compositor =
            Compositor::new(config.mask_rgb()?, config.mask_opacity, config.mask_blend_mode)?;
        Ok(Self {
            compositor,
            brush: BrushEngine::new(config.cursor_size),
            callbacks,
            state: EditorState::Unloaded,
            container: Size::new(config.container_width, config.container_height),
            source: None,
            image: None,
            last_ticket: 0,
            pending: None,
            last_error: None,
        })
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn size(&self) -> Option<Size> {
        self.compositor.size()
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    /// Error of the most recent failed load, cleared by the next `set_source`.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn cursor_size(&self) -> f32 {
        self.brush.radius()
    }

    /// Start loading a new source. Any load still in flight becomes stale.
    pub fn set_source(&mut self, src: &str) -> LoadTicket {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        self.source = Some(ImageSource::parse(src));
        self.image = None;
        self.pending = Some(ticket);
        self.last_error = None;
        self.state = EditorState::Loading;
        self.compositor.invalidate_base();
        debug!("loading {src} ({ticket:?})");
        ticket
    }

    /// Deliver the outcome of a load. Returns false if `ticket` was superseded.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<RgbaImage>) -> Result<bool> {
        if self.pending != Some(ticket) {
            warn!("dropping stale image load {ticket:?}");
            return Ok(false);
        }
        self.pending = None;
        let result = result.and_then(|image| match image.dimensions() {
            (0, _) | (_, 0) => Err(Error::ImageLoad(format!(
                "decoded image is {}x{}",
                image.width(),
                image.height()
            ))),
            _ => Ok(image),
        });
        match result {
            Ok(image) => {
                self.image = Some(image);
                self.fit()?;
            }
            Err(err) => {
                warn!("source image failed to load: {err}");
                if let Some(notify) = self.callbacks.on_image_load_failed.as_mut() {
                    notify(&err);
                }
                self.last_error = Some(err);
            }
        }
        Ok(true)
    }

    /// Set the source and fetch it synchronously.
    pub fn load(&mut self, src: &str) -> Result<()> {
        let ticket = self.set_source(src);
        let result = fetch_image(&ImageSource::parse(src));
        self.complete_load(ticket, result)?;
        match &self.last_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Re-measure the container; a held image is fitted again.
    pub fn set_container(&mut self, width: u32, height: u32) -> Result<()> {
        self.container = Size::new(width, height);
        if self.image.is_some() {
            self.fit()?;
        }
        Ok(())
    }

    fn fit(&mut self) -> Result<()> {
        let Some(image) = self.image.as_ref() else {
            return Ok(());
        };
        self.state = EditorState::Loading;
        let size = fit_size(image.dimensions(), self.container);
        // resizing clears every layer, so only do it when the size changed
        if self.compositor.size() != Some(size) {
            self.compositor.resize(size);
        }
        let scaled = imageops::resize(image, size.x, size.y, FilterType::Triangle);
        self.compositor.redraw_base(&scaled)?;
        self.state = EditorState::Fitted;
        debug!("fitted {:?} into {:?} as {:?}", image.dimensions(), self.container, size);
        Ok(())
    }

    pub fn set_cursor_size(&mut self, radius: f32) {
        self.brush.set_radius(radius);
    }

    pub fn set_mask_color(&mut self, hex: &str) -> Result<()> {
        self.compositor.set_mask_color(hex_to_rgb(hex)?)
    }

    pub fn set_mask_opacity(&mut self, opacity: f32) {
        self.compositor.set_mask_opacity(opacity);
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.compositor.set_blend_mode(mode);
    }

    pub fn clear_mask(&mut self) {
        self.compositor.clear_mask();
    }

    pub fn invert_mask(&mut self) -> Result<()> {
        self.compositor.invert_mask()
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Stroke {
        self.brush.pointer_move(&mut self.compositor, event)
    }

    pub fn wheel(&mut self, event: WheelEvent) -> WheelOutcome {
        let notify = self
            .callbacks
            .on_cursor_size_change
            .as_mut()
            .map(|f| f.as_mut() as &mut dyn FnMut(f32));
        self.brush.wheel(&mut self.compositor, event, notify)
    }

    pub fn mask_snapshot(&self) -> Result<&RgbaImage> {
        self.compositor.mask_snapshot()
    }

    pub fn base_snapshot(&self) -> Result<&RgbaImage> {
        self.compositor.base_snapshot()
    }

    pub fn composite(&self) -> Option<RgbaImage> {
        self.compositor.composite()
    }

    /// Export the black/white mask and the base image for the host.
    pub fn export(&mut self) -> Result<Exported> {
        if self.state != EditorState::Fitted {
            return Err(Error::SurfaceNotReady("no fitted image to export"));
        }
        let mask = self.compositor.mask().ok_or(Error::SurfaceNotReady("mask"))?;
        let mask_url = to_mask(mask)?;
        let image_url = to_data_url(self.compositor.base_snapshot()?)?;

        let payload = |url: &str| {
            to_file_payload(url).ok_or_else(|| Error::MalformedDataUrl("snapshot".into()))
        };
        let exported = Exported { mask: payload(&mask_url)?, image: payload(&image_url)? };
        info!(
            "exported mask ({} bytes) and image ({} bytes)",
            exported.mask.size_bytes, exported.image.size_bytes
        );
        if let Some(notify) = self.callbacks.on_export.as_mut() {
            notify(&exported);
        }
        Ok(exported)
    }
}
