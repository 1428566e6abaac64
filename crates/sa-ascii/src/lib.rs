/// ASCII conversion engine for scenascii.
///
/// Converts RGBA pixel frames to character grids: the luminance mapper turns a
/// pixel into a brightness, the character ramp turns a brightness into a glyph,
/// and the rasterizer drives both over a whole frame.
pub mod luminance;
pub mod rasterizer;

pub use rasterizer::{Rasterizer, rasterize, rasterize_into, rasterize_sampled, render_text};
