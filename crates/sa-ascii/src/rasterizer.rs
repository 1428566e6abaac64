use rayon::prelude::*;
use sa_core::charset::CharacterRamp;
use sa_core::config::RenderConfig;
use sa_core::error::CoreError;
use sa_core::frame::{AsciiCell, AsciiGrid, FrameBuffer};

use crate::luminance;

/// Rasterizer: pixel frame → ASCII grid, with a cached character ramp.
///
/// The ramp is rebuilt only when the configured charset changes, so one
/// instance can be fed a fresh config snapshot every tick.
///
/// # Example
/// ```
/// use sa_ascii::rasterizer::Rasterizer;
/// use sa_core::config::RenderConfig;
/// use sa_core::frame::{AsciiGrid, FrameBuffer};
///
/// let config = RenderConfig::default();
/// let mut rasterizer = Rasterizer::new(&config.charset).unwrap();
/// let frame = FrameBuffer::new(8, 4);
/// let mut grid = AsciiGrid::new(1, 1);
/// rasterizer.process(&frame, &config, &mut grid).unwrap();
/// assert_eq!((grid.width, grid.height), (8, 4));
/// ```
pub struct Rasterizer {
    ramp: CharacterRamp,
    current_charset: String,
}

impl Rasterizer {
    /// Create a rasterizer for the given charset.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] if the charset is empty.
    pub fn new(charset: &str) -> Result<Self, CoreError> {
        Ok(Self {
            ramp: CharacterRamp::new(charset)?,
            current_charset: charset.to_string(),
        })
    }

    /// Rebuild the ramp if the charset has changed.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] if the new charset is empty;
    /// the previous ramp is kept in that case.
    pub fn update_if_needed(&mut self, charset: &str) -> Result<(), CoreError> {
        if self.current_charset != charset {
            self.ramp = CharacterRamp::new(charset)?;
            self.current_charset = charset.to_string();
            log::debug!("Rampe reconstruite ({} caractères)", self.ramp.len());
        }
        Ok(())
    }

    /// Active ramp.
    #[must_use]
    pub fn ramp(&self) -> &CharacterRamp {
        &self.ramp
    }

    /// Convert `frame` pixel-for-pixel: `grid` is resized to the frame's W×H.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] or
    /// [`CoreError::DimensionMismatch`]; `grid` is untouched on error.
    pub fn process(
        &mut self,
        frame: &FrameBuffer,
        config: &RenderConfig,
        grid: &mut AsciiGrid,
    ) -> Result<(), CoreError> {
        self.prepare(frame, config)?;
        grid.ensure_size(frame.width, frame.height);
        self.fill(frame, config, grid);
        Ok(())
    }

    /// Convert `frame` onto `grid` at the grid's own dimensions, sampling the
    /// nearest pixel for each cell.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] or
    /// [`CoreError::DimensionMismatch`]; `grid` is untouched on error.
    pub fn process_sampled(
        &mut self,
        frame: &FrameBuffer,
        config: &RenderConfig,
        grid: &mut AsciiGrid,
    ) -> Result<(), CoreError> {
        self.prepare(frame, config)?;
        self.fill(frame, config, grid);
        Ok(())
    }

    fn prepare(&mut self, frame: &FrameBuffer, config: &RenderConfig) -> Result<(), CoreError> {
        config.validate()?;
        frame.check_dimensions()?;
        self.update_if_needed(&config.charset)
    }

    /// Row-parallel fill. Each row is independent, so the output matches a
    /// sequential top-to-bottom, left-to-right pass exactly.
    fn fill(&self, frame: &FrameBuffer, config: &RenderConfig, grid: &mut AsciiGrid) {
        if grid.width == 0 || grid.height == 0 {
            return;
        }
        let cols = grid.width;
        let rows = grid.height;
        let ramp = &self.ramp;

        grid.cells
            .par_chunks_mut(cols as usize)
            .enumerate()
            .for_each(|(cy, row)| {
                let py = sample_coord(cy as u32, rows, frame.height);
                for (cx, cell) in row.iter_mut().enumerate() {
                    let px = sample_coord(cx as u32, cols, frame.width);
                    let (r, g, b) = source_rgb(frame, px, py);
                    let value = luminance::brightness(r, g, b, config);
                    *cell = AsciiCell {
                        ch: ramp.select(value),
                        fg: (r, g, b),
                    };
                }
            });
    }
}

/// Map a grid coordinate to a source coordinate (nearest, clamped).
#[inline(always)]
fn sample_coord(c: u32, cells: u32, pixels: u32) -> u32 {
    let p = (u64::from(c) * u64::from(pixels) / u64::from(cells.max(1))) as u32;
    p.min(pixels.saturating_sub(1))
}

/// An empty frame samples as black.
#[inline(always)]
fn source_rgb(frame: &FrameBuffer, px: u32, py: u32) -> (u8, u8, u8) {
    if frame.width == 0 || frame.height == 0 {
        return (0, 0, 0);
    }
    let (r, g, b, _) = frame.pixel(px, py);
    (r, g, b)
}

/// Rasterize a frame into a new W×H grid.
///
/// # Errors
/// Returns [`CoreError::InvalidConfiguration`] or [`CoreError::DimensionMismatch`].
///
/// # Example
/// ```
/// use sa_ascii::rasterize;
/// use sa_core::config::RenderConfig;
/// use sa_core::frame::FrameBuffer;
///
/// let frame = FrameBuffer::from_rgba(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
/// let config = RenderConfig { charset: " #".into(), ..RenderConfig::default() };
/// assert_eq!(rasterize(&frame, &config).unwrap().to_text(), " #");
/// ```
pub fn rasterize(frame: &FrameBuffer, config: &RenderConfig) -> Result<AsciiGrid, CoreError> {
    let mut grid = AsciiGrid::new(0, 0);
    rasterize_into(frame, config, &mut grid)?;
    Ok(grid)
}

/// Rasterize into an existing grid, reallocating only on a size change.
///
/// # Errors
/// Returns [`CoreError::InvalidConfiguration`] or [`CoreError::DimensionMismatch`].
pub fn rasterize_into(
    frame: &FrameBuffer,
    config: &RenderConfig,
    grid: &mut AsciiGrid,
) -> Result<(), CoreError> {
    Rasterizer::new(&config.charset)?.process(frame, config, grid)
}

/// Rasterize onto a caller-sized `cols × rows` grid by nearest sampling.
///
/// # Errors
/// Returns [`CoreError::InvalidConfiguration`] or [`CoreError::DimensionMismatch`].
///
/// # Example
/// ```
/// use sa_ascii::rasterize_sampled;
/// use sa_core::config::RenderConfig;
/// use sa_core::frame::FrameBuffer;
///
/// let frame = FrameBuffer::new(640, 360);
/// let grid = rasterize_sampled(&frame, &RenderConfig::default(), 80, 24).unwrap();
/// assert_eq!((grid.width, grid.height), (80, 24));
/// ```
pub fn rasterize_sampled(
    frame: &FrameBuffer,
    config: &RenderConfig,
    cols: u32,
    rows: u32,
) -> Result<AsciiGrid, CoreError> {
    let mut rasterizer = Rasterizer::new(&config.charset)?;
    rasterizer.prepare(frame, config)?;
    let mut grid = AsciiGrid::new(cols, rows);
    rasterizer.fill(frame, config, &mut grid);
    Ok(grid)
}

/// Rasterize and return the text form (rows joined by `\n`).
///
/// # Errors
/// Returns [`CoreError::InvalidConfiguration`] or [`CoreError::DimensionMismatch`].
pub fn render_text(frame: &FrameBuffer, config: &RenderConfig) -> Result<String, CoreError> {
    Ok(rasterize(frame, config)?.to_text())
}
