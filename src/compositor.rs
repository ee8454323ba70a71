// Three aligned layers: base image (bottom), mask (opacity + blend mode) and
// the cursor preview (top). The layers only exist after the first resize.

use crate::blend::{composite_pixel, BlendMode};
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::mask::MaskLayer;
use crate::types::{Size, Surface};
use image::RgbaImage;
use log::debug;

#[derive(Debug, Clone)]
struct Layers {
    base: Surface,
    mask: MaskLayer,
    cursor: Surface,
}

#[derive(Debug, Clone)]
pub struct Compositor {
    layers: Option<Layers>,
    // bumped on every resize; anything drawn before belongs to an older epoch
    epoch: u64,
    base_ready: bool,
    mask_color: Rgb,
    mask_opacity: f32,
    blend_mode: BlendMode,
}

impl Compositor {
    pub fn new(mask_color: Rgb, mask_opacity: f32, blend_mode: BlendMode) -> Result<Self> {
        if mask_color.is_white() {
            return Err(Error::ReservedMaskColor(mask_color.to_hex()));
        }
        Ok(Self {
            layers: None,
            epoch: 0,
            base_ready: false,
            mask_color,
            mask_opacity: mask_opacity.clamp(0.0, 1.0),
            blend_mode,
        })
    }

    pub fn size(&self) -> Option<Size> {
        self.layers.as_ref().map(|l| l.base.size())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Layers exist and the base has been redrawn since the last resize.
    pub fn is_consistent(&self) -> bool {
        self.layers.is_some() && self.base_ready
    }

    /// Recreate all three layers at `size`. Prior content is gone: the mask
    /// starts white and the base must be redrawn with [`Self::redraw_base`].
    pub fn resize(&mut self, size: Size) {
        self.layers = Some(Layers {
            base: Surface::new(size),
            mask: MaskLayer::new(size, self.mask_color),
            cursor: Surface::new(size),
        });
        self.epoch += 1;
        self.base_ready = false;
        debug!("resized layers to {}x{} (epoch {})", size.x, size.y, self.epoch);
    }

    /// Second phase of a resize: paint the already scaled source image.
    pub fn redraw_base(&mut self, image: &RgbaImage) -> Result<()> {
        let layers = self.layers.as_mut().ok_or(Error::SurfaceNotReady("base"))?;
        layers.base.clear();
        layers.base.draw_image(image);
        self.base_ready = true;
        Ok(())
    }

    /// The base no longer shows the current source (a new one is loading).
    pub fn invalidate_base(&mut self) {
        self.base_ready = false;
    }

    pub fn mask_color(&self) -> Rgb {
        self.mask_color
    }

    pub fn mask_opacity(&self) -> f32 {
        self.mask_opacity
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_mask_opacity(&mut self, opacity: f32) {
        self.mask_opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Change the mask color and recolor the painted region to match.
    pub fn set_mask_color(&mut self, color: Rgb) -> Result<()> {
        if color.is_white() {
            return Err(Error::ReservedMaskColor(color.to_hex()));
        }
        self.mask_color = color;
        if let Some(layers) = self.layers.as_mut() {
            layers.mask.remap(color, false)?;
        }
        Ok(())
    }

    pub fn clear_mask(&mut self) {
        if let Some(layers) = self.layers.as_mut() {
            layers.mask.clear();
        }
    }

    pub fn invert_mask(&mut self) -> Result<()> {
        match self.layers.as_mut() {
            Some(layers) => layers.mask.remap(self.mask_color, true),
            None => Ok(()),
        }
    }

    pub fn base(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|l| &l.base)
    }

    pub fn mask(&self) -> Option<&MaskLayer> {
        self.layers.as_ref().map(|l| &l.mask)
    }

    pub fn cursor(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|l| &l.cursor)
    }

    pub fn mask_mut(&mut self) -> Option<&mut MaskLayer> {
        self.layers.as_mut().map(|l| &mut l.mask)
    }

    pub fn cursor_mut(&mut self) -> Option<&mut Surface> {
        self.layers.as_mut().map(|l| &mut l.cursor)
    }

    /// Base pixels, only once the base has been redrawn after the last resize.
    pub fn base_snapshot(&self) -> Result<&RgbaImage> {
        if !self.base_ready {
            return Err(Error::SurfaceNotReady("base not redrawn since resize"));
        }
        self.base().map(Surface::image).ok_or(Error::SurfaceNotReady("base"))
    }

    pub fn mask_snapshot(&self) -> Result<&RgbaImage> {
        self.mask()
            .map(|m| m.surface().image())
            .ok_or(Error::SurfaceNotReady("mask"))
    }

    /// What the user sees: base, then mask (opacity + blend), then cursor.
    pub fn composite(&self) -> Option<RgbaImage> {
        let layers = self.layers.as_ref()?;
        let mut out = layers.base.image().clone();
        let mask = layers.mask.surface().image();
        let cursor = layers.cursor.image();
        for (x, y, px) in out.enumerate_pixels_mut() {
            let with_mask =
                composite_pixel(*px, *mask.get_pixel(x, y), self.blend_mode, self.mask_opacity);
            *px = composite_pixel(with_mask, *cursor.get_pixel(x, y), BlendMode::Normal, 1.0);
        }
        Some(out)
    }
}
