// Core types shared by the layers: sizes, pointer positions and the RGBA surface.

use image::{Rgba, RgbaImage};

/// Surface dimensions in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub x: u32,
    pub y: u32,
}

impl Size {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn pixel_count(self) -> usize {
        self.x as usize * self.y as usize
    }
}

/// Pointer position in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Visit every pixel whose center lies inside the disc at `center` with `radius`.
/// Pixels outside `size` are skipped.
pub fn for_each_in_disc(size: Size, center: Point, radius: f32, mut f: impl FnMut(u32, u32)) {
    if radius <= 0.0 || size.x == 0 || size.y == 0 {
        return;
    }
    let r2 = radius * radius;
    let x0 = (center.x - radius).floor().max(0.0) as u32;
    let y0 = (center.y - radius).floor().max(0.0) as u32;
    let x1 = (center.x + radius).ceil().min(size.x as f32 - 1.0);
    let y1 = (center.y + radius).ceil().min(size.y as f32 - 1.0);
    if x1 < 0.0 || y1 < 0.0 {
        return;
    }
    let (x1, y1) = (x1 as u32, y1 as u32);

    for y in y0..=y1 {
        let dy = y as f32 + 0.5 - center.y;
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            if dx * dx + dy * dy <= r2 {
                f(x, y);
            }
        }
    }
}

/// One aligned RGBA layer of the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(size: Size) -> Self {
        Self { pixels: RgbaImage::new(size.x, size.y) }
    }

    pub fn filled(size: Size, color: Rgba<u8>) -> Self {
        Self { pixels: RgbaImage::from_pixel(size.x, size.y, color) }
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn clear(&mut self) {
        self.fill(TRANSPARENT);
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for px in self.pixels.pixels_mut() {
            *px = color;
        }
    }

    /// Overwrite every pixel inside the disc with `color` (no blending).
    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba<u8>) {
        let size = self.size();
        let pixels = &mut self.pixels;
        for_each_in_disc(size, center, radius, |x, y| pixels.put_pixel(x, y, color));
    }

    /// One pixel wide outline of the circle.
    pub fn stroke_circle(&mut self, center: Point, radius: f32, color: Rgba<u8>) {
        if radius <= 0.0 {
            return;
        }
        let size = self.size();
        let outer = radius + 0.5;
        let inner2 = (radius - 0.5).max(0.0).powi(2);
        let pixels = &mut self.pixels;
        for_each_in_disc(size, center, outer, |x, y| {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy >= inner2 {
                pixels.put_pixel(x, y, color);
            }
        });
    }

    /// Copy `image` onto the top-left corner, clipped to this surface.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        image::imageops::replace(&mut self.pixels, image, 0, 0);
    }
}
