//! Binary mask painting over a source image.
//!
//! Three aligned layers (base image, mask, cursor preview) are driven by a
//! circular brush; the mask exports as a black/white PNG data URL and both
//! layers are handed to the host as flat `{name, type, base64Data, sizeBytes}`
//! records.

pub mod blend;
pub mod brush;
pub mod color;
pub mod compositor;
pub mod config;
pub mod editor;
pub mod error;
pub mod loader;
pub mod mask;
pub mod serialize;
pub mod types;

pub use blend::BlendMode;
pub use brush::{Buttons, PointerEvent, Stroke, WheelEvent, WheelOutcome};
pub use color::{hex_to_rgb, Rgb};
pub use config::EditorConfig;
pub use editor::{fit_size, EditorCallbacks, EditorState, Exported, LoadTicket, MaskEditor};
pub use error::{Error, Result};
pub use serialize::{to_data_url, to_file_payload, to_mask, ExportPayload};
pub use types::{Point, Size};
