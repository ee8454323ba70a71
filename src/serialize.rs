// Turns surfaces into PNG data URLs and data URLs into host file payloads.

use crate::error::{Error, Result};
use crate::mask::MaskLayer;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

// Padding is optional on input, like a browser's `atob`.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Flat record handed to the host: `{name, type, base64Data, sizeBytes}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub base64_data: String,
    pub size_bytes: usize,
}

impl ExportPayload {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encode(e.to_string()))
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// `data:image/png;base64,...` snapshot of any surface.
pub fn to_data_url(image: &RgbaImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Black/white export of the mask: unmasked pixels become opaque black and
/// masked pixels opaque white. The live layer is only read.
pub fn to_mask(mask: &MaskLayer) -> Result<String> {
    let size = mask.size();
    let coverage = mask.coverage();
    let bw = RgbaImage::from_fn(size.x, size.y, |x, y| {
        if coverage[(y * size.x + x) as usize] {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    to_data_url(&bw)
}

/// Split a `data:<mime>;base64,<data>` URL into its MIME type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let (mime, data) = split_data_url(url)?;
    let bytes = LENIENT
        .decode(data)
        .map_err(|e| Error::MalformedDataUrl(format!("bad base64: {e}")))?;
    Ok((mime.to_string(), bytes))
}

fn split_data_url(url: &str) -> Result<(&str, &str)> {
    let segments: Vec<&str> = url.split(',').collect();
    if segments.len() < 2 {
        return Err(Error::MalformedDataUrl("missing ',' separator".into()));
    }
    let head = segments[0];
    let mime = head
        .find(':')
        .and_then(|start| {
            let rest = &head[start + 1..];
            rest.find(';').map(|end| &rest[..end])
        })
        .ok_or_else(|| Error::MalformedDataUrl("missing ':<mime>;' prefix".into()))?;
    Ok((mime, segments[segments.len() - 1]))
}

/// Build the host payload for a data URL; `None` when the URL is malformed.
pub fn to_file_payload(url: &str) -> Option<ExportPayload> {
    let (mime, data) = split_data_url(url).ok()?;
    let (_, bytes) = decode_data_url(url).ok()?;
    Some(ExportPayload {
        name: mime.replacen('/', ".", 1),
        mime: mime.to_string(),
        base64_data: data.to_string(),
        size_bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::types::{Point, Size};

    fn decode_png(url: &str) -> RgbaImage {
        let (mime, bytes) = decode_data_url(url).unwrap();
        assert_eq!(mime, "image/png");
        image::load_from_memory(&bytes).unwrap().to_rgba8()
    }

    #[test]
    fn unmasked_layer_exports_all_black() {
        let mask = MaskLayer::new(Size::new(12, 7), Rgb(0x23, 0x27, 0x2d));
        let out = decode_png(&to_mask(&mask).unwrap());
        assert_eq!(out.dimensions(), (12, 7));
        assert!(out.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn fully_masked_layer_exports_all_white() {
        let mut mask = MaskLayer::new(Size::new(6, 6), Rgb(0x23, 0x27, 0x2d));
        mask.stamp(Point::new(3.0, 3.0), 100.0, true);
        let out = decode_png(&to_mask(&mask).unwrap());
        assert!(out.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn to_mask_is_idempotent_and_leaves_layer_untouched() {
        let mut mask = MaskLayer::new(Size::new(20, 20), Rgb(255, 255, 0));
        mask.stamp(Point::new(8.0, 8.0), 5.0, true);
        let before = mask.surface().image().clone();

        let first = to_mask(&mask).unwrap();
        assert_eq!(mask.surface().image(), &before);
        let second = to_mask(&mask).unwrap();
        assert_eq!(mask.surface().image(), &before);
        assert_eq!(first, second);

        // A yellow mask color has red == 255 and must still export as masked.
        let out = decode_png(&first);
        assert_eq!(*out.get_pixel(8, 8), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(19, 19), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn payload_size_matches_decoded_length() {
        let url = to_data_url(&RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 255]))).unwrap();
        let payload = to_file_payload(&url).unwrap();
        assert_eq!(payload.name, "image.png");
        assert_eq!(payload.mime, "image/png");
        assert_eq!(payload.size_bytes, STANDARD.decode(&payload.base64_data).unwrap().len());
    }

    #[test]
    fn unpadded_base64_is_accepted() {
        let payload = to_file_payload("data:text/plain;base64,aGVsbG8").unwrap();
        assert_eq!(payload.base64_data, "aGVsbG8");
        assert_eq!(payload.size_bytes, 5);
    }

    #[test]
    fn payload_from_plain_text_url() {
        let payload = to_file_payload("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.name, "text.plain");
        assert_eq!(payload.base64_data, "aGVsbG8=");
        assert_eq!(payload.size_bytes, 5);
    }

    #[test]
    fn malformed_urls_yield_none() {
        assert_eq!(to_file_payload("not-a-data-url"), None);
        assert_eq!(to_file_payload("data-image/png-base64,AAAA"), None);
        assert_eq!(to_file_payload("data:image/png;base64,%%%"), None);
        assert!(matches!(
            decode_data_url("not-a-data-url"),
            Err(Error::MalformedDataUrl(_))
        ));
    }

    #[test]
    fn payload_json_uses_host_keys() {
        let payload = to_file_payload("data:text/plain;base64,aGVsbG8=").unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "text.plain");
        assert_eq!(json["type"], "text/plain");
        assert_eq!(json["base64Data"], "aGVsbG8=");
        assert_eq!(json["sizeBytes"], 5);
    }
}
