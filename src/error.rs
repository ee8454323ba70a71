// One error type for the whole editor.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Hex color was not `#rrggbb` / `rrggbb`.
    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// White is the "unmasked" sentinel and can't be painted with.
    #[error("Mask color {0} is reserved for unmasked pixels")]
    ReservedMaskColor(String),

    #[error("Unknown blend mode: {0:?}")]
    InvalidBlendMode(String),

    /// Input did not look like `data:<mime>;base64,<data>`.
    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    /// Fetching or decoding the source image failed.
    #[error("Image load failed: {0}")]
    ImageLoad(String),

    /// A surface was used before it exists or before the base was redrawn.
    #[error("Surface not ready: {0}")]
    SurfaceNotReady(&'static str),

    /// PNG encoding of a surface failed.
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Config error: {0}")]
    Config(String),

    /// Writing exported payloads to disk failed.
    #[error("I/O error: {0}")]
    Io(String),

    // Front end only
    #[error("Window init error: {0}")]
    WindowInit(String),
    #[error("Window update error: {0}")]
    WindowUpdate(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode(err.to_string())
    }
}
