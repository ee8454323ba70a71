// Hex <-> RGB conversion for mask colors.

use crate::error::{Error, Result};
use image::Rgba;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn is_white(self) -> bool {
        self == Rgb::WHITE
    }

    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, alpha])
    }

    pub fn opaque(self) -> Rgba<u8> {
        self.with_alpha(255)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parse `#rrggbb` (the `#` is optional) into an [`Rgb`].
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColorFormat(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| Error::InvalidColorFormat(hex.to_string()))
    };
    Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pairs_base16() {
        assert_eq!(hex_to_rgb("#23272d").unwrap(), Rgb(0x23, 0x27, 0x2d));
        assert_eq!(hex_to_rgb("BDFF05").unwrap(), Rgb(189, 255, 5));
        assert_eq!(hex_to_rgb("#000000").unwrap(), Rgb::BLACK);
        assert_eq!(hex_to_rgb("#FFFFFF").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn every_channel_value_round_trips() {
        for v in 0..=255u8 {
            let hex = format!("#{v:02X}{:02x}{v:02x}", 255 - v);
            assert_eq!(hex_to_rgb(&hex).unwrap(), Rgb(v, 255 - v, v));
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "#", "#fff", "#12345", "#1234567", "#gg0000", "##123456", "12 456"] {
            assert!(
                matches!(hex_to_rgb(bad), Err(Error::InvalidColorFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn to_hex_is_lowercase() {
        assert_eq!(Rgb(0xAB, 0x01, 0xFF).to_hex(), "#ab01ff");
    }
}
