// Blend modes used when the mask layer is composited over the base image.
// Formulas follow the CSS compositing model (separable + non-separable modes).

use crate::error::Error;
use image::Rgba;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }

    /// B(Cb, Cs) on normalized RGB.
    fn mix(self, cb: [f32; 3], cs: [f32; 3]) -> [f32; 3] {
        let sep = |f: fn(f32, f32) -> f32| [f(cb[0], cs[0]), f(cb[1], cs[1]), f(cb[2], cs[2])];
        match self {
            BlendMode::Normal => cs,
            BlendMode::Multiply => sep(|b, s| b * s),
            BlendMode::Screen => sep(screen),
            BlendMode::Overlay => sep(|b, s| hard_light(s, b)),
            BlendMode::Darken => sep(f32::min),
            BlendMode::Lighten => sep(f32::max),
            BlendMode::ColorDodge => sep(color_dodge),
            BlendMode::ColorBurn => sep(color_burn),
            BlendMode::HardLight => sep(hard_light),
            BlendMode::SoftLight => sep(soft_light),
            BlendMode::Difference => sep(|b, s| (b - s).abs()),
            BlendMode::Exclusion => sep(|b, s| b + s - 2.0 * b * s),
            BlendMode::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
            BlendMode::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
            BlendMode::Color => set_lum(cs, lum(cb)),
            BlendMode::Luminosity => set_lum(cb, lum(cs)),
        }
    }
}

impl FromStr for BlendMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlendMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::InvalidBlendMode(s.to_string()))
    }
}

/// Composite `src` over `dst` with `mode`, scaling the source alpha by `opacity`.
pub fn composite_pixel(dst: Rgba<u8>, src: Rgba<u8>, mode: BlendMode, opacity: f32) -> Rgba<u8> {
    let a_s = src[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);
    if a_s <= 0.0 {
        return dst;
    }
    let a_b = dst[3] as f32 / 255.0;
    let cb = [dst[0], dst[1], dst[2]].map(|c| c as f32 / 255.0);
    let cs = [src[0], src[1], src[2]].map(|c| c as f32 / 255.0);

    let mixed = mode.mix(cb, cs);
    let a_o = a_s + a_b * (1.0 - a_s);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let cs_i = (1.0 - a_b) * cs[i] + a_b * mixed[i].clamp(0.0, 1.0);
        let co = (a_s * cs_i + a_b * (1.0 - a_s) * cb[i]) / a_o;
        out[i] = (co * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (a_o * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

fn screen(b: f32, s: f32) -> f32 {
    b + s - b * s
}

fn hard_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 { b * 2.0 * s } else { screen(b, 2.0 * s - 1.0) }
}

fn color_dodge(b: f32, s: f32) -> f32 {
    if b == 0.0 {
        0.0
    } else if s >= 1.0 {
        1.0
    } else {
        (b / (1.0 - s)).min(1.0)
    }
}

fn color_burn(b: f32, s: f32) -> f32 {
    if b >= 1.0 {
        1.0
    } else if s <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - b) / s).min(1.0)
    }
}

fn soft_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b - (1.0 - 2.0 * s) * b * (1.0 - b)
    } else {
        let d = if b <= 0.25 { ((16.0 * b - 12.0) * b + 4.0) * b } else { b.sqrt() };
        b + (2.0 * s - 1.0) * (d - b)
    }
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    c.map(|v| {
        let mut v = v;
        if n < 0.0 {
            v = l + (v - l) * l / (l - n);
        }
        if x > 1.0 {
            v = l + (v - l) * (1.0 - l) / (x - l);
        }
        v
    })
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color(c.map(|v| v + d))
}

fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    if max <= min {
        return [0.0; 3];
    }
    c.map(|v| {
        if v == max {
            s
        } else if v == min {
            0.0
        } else {
            (v - min) * s / (max - min)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    #[test]
    fn parses_css_names() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.name().parse::<BlendMode>().unwrap(), mode);
        }
        assert!(matches!("plus".parse::<BlendMode>(), Err(Error::InvalidBlendMode(_))));
    }

    #[test]
    fn deserializes_kebab_case() {
        let mode: BlendMode = serde_json::from_str("\"color-dodge\"").unwrap();
        assert_eq!(mode, BlendMode::ColorDodge);
    }

    #[test]
    fn normal_full_opacity_replaces() {
        let src = Rgba([10, 20, 30, 255]);
        assert_eq!(composite_pixel(GRAY, src, BlendMode::Normal, 1.0), src);
    }

    #[test]
    fn zero_opacity_keeps_backdrop() {
        for mode in BlendMode::ALL {
            assert_eq!(composite_pixel(GRAY, Rgba([1, 2, 3, 255]), mode, 0.0), GRAY);
        }
    }

    #[test]
    fn multiply_with_white_is_identity() {
        assert_eq!(composite_pixel(GRAY, WHITE, BlendMode::Multiply, 1.0), GRAY);
    }

    #[test]
    fn normal_opacity_mixes_linearly() {
        let out = composite_pixel(WHITE, Rgba([0, 0, 0, 255]), BlendMode::Normal, 0.75);
        assert_eq!(out, Rgba([64, 64, 64, 255]));
    }

    #[test]
    fn difference_of_equal_colors_is_black() {
        assert_eq!(
            composite_pixel(GRAY, GRAY, BlendMode::Difference, 1.0),
            Rgba([0, 0, 0, 255])
        );
    }

    #[test]
    fn luminosity_of_gray_over_gray_is_gray() {
        assert_eq!(composite_pixel(GRAY, GRAY, BlendMode::Luminosity, 1.0), GRAY);
    }
}
