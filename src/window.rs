// Window + input for the desktop front end.
// The editor draws into RGBA layers; this module only shows the composite
// and turns minifb mouse/keyboard state into editor events.

use mask_editor::{Buttons, Error, Point, Size};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Letterbox color around the fitted image (0x00RRGGBB).
const BACKGROUND: u32 = 0x00_20_20_20;

pub struct Drawer {
    window: Window,
    size: Size,
    frame: Vec<u32>,
}

impl Drawer {
    /// Create a window the size of the editor container.
    /// Visual: a new window filled with the letterbox color appears.
    pub fn new(title: &str, size: Size) -> Result<Self, Error> {
        let window = Window::new(title, size.x as usize, size.y as usize, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, size, frame: vec![BACKGROUND; size.pixel_count()] })
    }

    /// Push the composited layers (top-left aligned) to the screen.
    /// Visual: the window shows image, mask overlay and brush ring as one frame.
    pub fn present(&mut self, composite: Option<&image::RgbaImage>) -> Result<(), Error> {
        self.frame.fill(BACKGROUND);
        if let Some(img) = composite {
            let w = img.width().min(self.size.x);
            let h = img.height().min(self.size.y);
            for y in 0..h {
                for x in 0..w {
                    let [r, g, b, _] = img.get_pixel(x, y).0;
                    self.frame[(y * self.size.x + x) as usize] =
                        ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
                }
            }
        }
        self.window
            .update_with_buffer(&self.frame, self.size.x as usize, self.size.y as usize)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position, `None` while the mouse is outside the window.
    /// Visual: when this is Some, the brush ring is drawn there.
    pub fn mouse_pos(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x, y))
    }

    pub fn buttons(&self) -> Buttons {
        Buttons {
            primary: self.window.get_mouse_down(MouseButton::Left),
            secondary: self.window.get_mouse_down(MouseButton::Right),
            middle: self.window.get_mouse_down(MouseButton::Middle),
        }
    }

    pub fn shift_down(&self) -> bool {
        self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift)
    }

    /// Vertical wheel movement this frame, positive when scrolling down.
    /// Visual: the brush ring grows (down) or shrinks (up) by one pixel per tick.
    pub fn scroll_down(&self) -> Option<f32> {
        self.window
            .get_scroll_wheel()
            .map(|(_, y)| -y)
            .filter(|dy| *dy != 0.0)
    }

    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
}
