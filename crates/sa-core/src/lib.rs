/// Configuration, types, and shared structures for scenascii.
///
/// This crate contains the frame and grid types, the character ramps, the
/// render configuration and the error taxonomy shared across the workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::CharacterRamp;
pub use config::{RenderConfig, SceneConfig};
pub use error::CoreError;
pub use frame::{AsciiCell, AsciiGrid, FrameBuffer};
