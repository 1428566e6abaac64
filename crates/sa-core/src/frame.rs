use crate::error::CoreError;

/// Buffer de pixels réutilisable. Pré-alloué, jamais redimensionné en hot path.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué (noir transparent) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; Self::byte_len(width, height)],
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes, checking the length against the dimensions.
    ///
    /// # Errors
    /// Returns [`CoreError::DimensionMismatch`] if `data.len() != width × height × 4`.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// assert!(FrameBuffer::from_rgba(2, 1, vec![0; 8]).is_ok());
    /// assert!(FrameBuffer::from_rgba(2, 1, vec![0; 7]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let fb = Self {
            data,
            width,
            height,
        };
        fb.check_dimensions()?;
        Ok(fb)
    }

    /// Expected byte length for `width × height` RGBA pixels.
    #[inline]
    #[must_use]
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    /// Verify that the pixel buffer matches the declared dimensions.
    ///
    /// `data` is public, so callers that fill it by hand go through this
    /// before any per-pixel access.
    ///
    /// # Errors
    /// Returns [`CoreError::DimensionMismatch`] on a length mismatch.
    pub fn check_dimensions(&self) -> Result<(), CoreError> {
        let expected = Self::byte_len(self.width, self.height);
        if self.data.len() == expected {
            Ok(())
        } else {
            Err(CoreError::DimensionMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            })
        }
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Écrit le pixel (x, y). Hors limites : ignoré.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: (u8, u8, u8, u8)) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(idx..idx + 4) {
            px.copy_from_slice(&[rgba.0, rgba.1, rgba.2, rgba.3]);
        }
    }

    /// Remplit tout le buffer avec une couleur.
    pub fn fill(&mut self, rgba: (u8, u8, u8, u8)) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgba.0, rgba.1, rgba.2, rgba.3]);
        }
    }

    /// Reallocate only if the dimensions differ.
    pub fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }
}

/// Grille de sortie ASCII. Pré-allouée, réutilisée chaque frame.
///
/// # Example
/// ```
/// use sa_core::frame::{AsciiGrid, AsciiCell};
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: (255, 0, 0) });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<AsciiCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

/// Single cell in the ASCII grid.
///
/// # Example
/// ```
/// use sa_core::frame::AsciiCell;
/// let cell = AsciiCell::default();
/// assert_eq!(cell.ch, ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur du pixel source (RGB), utilisée par l'affichage terminal.
    pub fg: (u8, u8, u8),
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (0, 0, 0),
        }
    }
}

impl AsciiGrid {
    /// Crée une grille pré-allouée.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: AsciiCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(10, 10);
    /// assert_eq!(grid.get(0, 0).ch, ' ');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &AsciiCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Reallocate only if the dimensions differ.
    pub fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    /// Iterate over rows as cell slices, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[AsciiCell]> {
        // chunks_exact(0) panics; a zero-width grid has no visible rows.
        let width = (self.width as usize).max(1);
        self.cells
            .chunks_exact(width)
            .take(if self.width == 0 { 0 } else { self.height as usize })
    }

    /// Text form: rows joined by `\n`, no trailing line break.
    ///
    /// Characters inside rows are kept as-is, trailing spaces included.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::{AsciiGrid, AsciiCell};
    /// let mut grid = AsciiGrid::new(2, 2);
    /// grid.set(1, 1, AsciiCell { ch: '#', fg: (0, 0, 0) });
    /// assert_eq!(grid.to_text(), "  \n #");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|c| c.ch));
        }
        out
    }

    /// Clear all cells to default (space, black).
    pub fn clear(&mut self) {
        self.cells.fill(AsciiCell::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_rejects_short_buffer() {
        let err = FrameBuffer::from_rgba(3, 2, vec![0; 23]).unwrap_err();
        assert_eq!(
            err,
            CoreError::DimensionMismatch {
                width: 3,
                height: 2,
                expected: 24,
                actual: 23
            }
        );
    }

    #[test]
    fn set_pixel_out_of_bounds_is_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(5, 0, (1, 2, 3, 4));
        assert!(fb.data.iter().all(|&b| b == 0));
        fb.set_pixel(1, 1, (1, 2, 3, 4));
        assert_eq!(fb.pixel(1, 1), (1, 2, 3, 4));
    }

    #[test]
    fn text_has_height_rows_of_width_chars() {
        let grid = AsciiGrid::new(7, 3);
        let text = grid.to_text();
        let rows: Vec<&str> = text.split('\n').collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.chars().count() == 7));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn empty_grid_renders_empty_text() {
        assert_eq!(AsciiGrid::new(0, 4).to_text(), "");
        assert_eq!(AsciiGrid::new(4, 0).to_text(), "");
    }

    #[test]
    fn ensure_size_keeps_matching_buffer() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill((9, 9, 9, 255));
        fb.ensure_size(4, 4);
        assert_eq!(fb.pixel(3, 3), (9, 9, 9, 255));
        fb.ensure_size(2, 2);
        assert_eq!(fb.data.len(), 16);
    }
}
