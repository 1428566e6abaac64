/// TUI rendering module for scenascii.
///
/// Provides canvas rendering, layout and FPS tracking.
pub mod canvas;
pub mod fps;
pub mod ui;
