// Fetch and decode the source image from a URL, a data URL or a local path.

use crate::error::{Error, Result};
use crate::serialize::decode_data_url;
use image::RgbaImage;
use log::debug;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    DataUrl(String),
    Path(PathBuf),
}

impl ImageSource {
    pub fn parse(src: &str) -> Self {
        if src.starts_with("http://") || src.starts_with("https://") {
            ImageSource::Url(src.to_string())
        } else if src.starts_with("data:") {
            ImageSource::DataUrl(src.to_string())
        } else {
            ImageSource::Path(PathBuf::from(src))
        }
    }
}

pub fn fetch_image(source: &ImageSource) -> Result<RgbaImage> {
    debug!("fetching source image {source:?}");
    let image = match source {
        ImageSource::Url(url) => image::load_from_memory(&fetch_url(url)?),
        ImageSource::DataUrl(url) => {
            let (_, bytes) =
                decode_data_url(url).map_err(|e| Error::ImageLoad(e.to_string()))?;
            image::load_from_memory(&bytes)
        }
        ImageSource::Path(path) => image::open(path),
    };
    image
        .map(|img| img.to_rgba8())
        .map_err(|e| Error::ImageLoad(e.to_string()))
}

#[cfg(feature = "http")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::ImageLoad(format!("{url}: {e}")))?;
    let bytes = response
        .bytes()
        .map_err(|e| Error::ImageLoad(format!("{url}: {e}")))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "http"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(Error::ImageLoad(format!("{url}: built without the `http` feature")))
}
