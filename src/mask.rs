// The paint mask: an RGBA surface for display plus a coverage bitmap that
// says which pixels are masked. Pixel colors are always derived from the
// bitmap, so no mask color (not even one with a full red channel) can be
// confused with the white "unmasked" sentinel.

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::types::{for_each_in_disc, Point, Size, Surface};
use bitvec::prelude::*;
use log::debug;

#[derive(Debug, Clone)]
pub struct MaskLayer {
    surface: Surface,
    coverage: BitVec,
    color: Rgb,
}

impl MaskLayer {
    /// Fresh, fully unmasked (white) layer.
    pub fn new(size: Size, color: Rgb) -> Self {
        Self {
            surface: Surface::filled(size, Rgb::WHITE.opaque()),
            coverage: bitvec![0; size.pixel_count()],
            color,
        }
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mask color currently baked into the surface.
    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn coverage(&self) -> &BitSlice {
        &self.coverage
    }

    pub fn is_masked(&self, x: u32, y: u32) -> bool {
        let size = self.size();
        x < size.x && y < size.y && self.coverage[(y * size.x + x) as usize]
    }

    pub fn masked_count(&self) -> usize {
        self.coverage.count_ones()
    }

    /// Stamp a disc: `paint` marks pixels masked, otherwise they are erased.
    pub fn stamp(&mut self, center: Point, radius: f32, paint: bool) {
        let size = self.size();
        let color = if paint { self.color.opaque() } else { Rgb::WHITE.opaque() };
        let image = self.surface.image_mut();
        let coverage = &mut self.coverage;
        for_each_in_disc(size, center, radius, |x, y| {
            image.put_pixel(x, y, color);
            coverage.set((y * size.x + x) as usize, paint);
        });
    }

    /// Back to the "no mask" state.
    pub fn clear(&mut self) {
        self.surface.fill(Rgb::WHITE.opaque());
        self.coverage.fill(false);
    }

    /// Recolor the whole layer in one pass. Masked pixels (XOR `invert`) take
    /// `color`, everything else becomes white. The alpha channel is preserved.
    pub fn remap(&mut self, color: Rgb, invert: bool) -> Result<()> {
        if color.is_white() {
            return Err(Error::ReservedMaskColor(color.to_hex()));
        }
        if invert {
            let coverage = std::mem::take(&mut self.coverage);
            self.coverage = !coverage;
        }
        self.color = color;

        let image = self.surface.image_mut();
        for (px, masked) in image.pixels_mut().zip(self.coverage.iter().by_vals()) {
            let Rgb(r, g, b) = if masked { color } else { Rgb::WHITE };
            px.0 = [r, g, b, px.0[3]];
        }
        debug!("remapped mask to {color} (invert: {invert})");
        Ok(())
    }
}
