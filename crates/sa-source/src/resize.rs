use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use sa_core::frame::FrameBuffer;

/// A terminal cell is about twice as tall as it is wide.
pub const CELL_ASPECT: u32 = 2;

/// Pixel size a scene should render at so that, once squeezed into
/// `cols × rows` cells, its shapes keep their proportions.
///
/// # Example
/// ```
/// use sa_source::resize::pixel_size_for_cells;
/// assert_eq!(pixel_size_for_cells(80, 24), (80, 48));
/// assert_eq!(pixel_size_for_cells(0, 0), (1, 1));
/// ```
#[must_use]
pub fn pixel_size_for_cells(cols: u32, rows: u32) -> (u32, u32) {
    (cols.max(1), rows.saturating_mul(CELL_ASPECT).max(1))
}

/// Downsampler frame → grille, wrappant fast_image_resize.
///
/// Filtre boîte : chaque cellule reçoit la moyenne des pixels qu'elle couvre.
/// Les buffers internes sont réutilisés d'une frame à l'autre.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// use sa_source::resize::Resizer;
/// let mut r = Resizer::new();
/// let src = FrameBuffer::new(100, 100);
/// let mut dst = FrameBuffer::new(50, 50);
/// r.resize_into(&src, &mut dst).unwrap();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Copie de la source (l'API exige `&mut`).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a box-filter resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`; `dst`'s dimensions set the output size.
    ///
    /// Same size is a plain copy. An empty source yields a black `dst`.
    ///
    /// # Errors
    /// Returns an error if either buffer is inconsistent or the resize fails.
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        src.check_dimensions()?;
        dst.check_dimensions()?;

        if (src.width, src.height) == (dst.width, dst.height) {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }
        if dst.data.is_empty() {
            return Ok(());
        }
        if src.data.is_empty() {
            dst.fill((0, 0, 0, 255));
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("Dimensions source invalides")?;
        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("Dimensions destination invalides")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .with_context(|| {
                format!(
                    "Resize {}×{} → {}×{} impossible",
                    src.width, src.height, dst.width, dst.height
                )
            })?;
        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot resize into a fresh buffer.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// use sa_source::resize::resize_frame;
/// let dst = resize_frame(&FrameBuffer::new(100, 100), 50, 25).unwrap();
/// assert_eq!((dst.width, dst.height), (50, 25));
/// ```
pub fn resize_frame(src: &FrameBuffer, width: u32, height: u32) -> Result<FrameBuffer> {
    let mut dst = FrameBuffer::new(width, height);
    Resizer::new().resize_into(src, &mut dst)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_is_a_copy() {
        let mut src = FrameBuffer::new(4, 3);
        src.fill((1, 2, 3, 4));
        let dst = resize_frame(&src, 4, 3).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn uniform_color_survives_downsampling() {
        let mut src = FrameBuffer::new(64, 32);
        src.fill((200, 100, 50, 255));
        let dst = resize_frame(&src, 16, 8).unwrap();
        for px in dst.data.chunks_exact(4) {
            assert!((i16::from(px[0]) - 200).abs() <= 1);
            assert!((i16::from(px[1]) - 100).abs() <= 1);
            assert!((i16::from(px[2]) - 50).abs() <= 1);
        }
    }

    #[test]
    fn halves_are_kept_apart() {
        let mut src = FrameBuffer::new(8, 2);
        for y in 0..2 {
            for x in 4..8 {
                src.set_pixel(x, y, (255, 255, 255, 255));
            }
        }
        let dst = resize_frame(&src, 2, 1).unwrap();
        assert!(dst.pixel(0, 0).0 <= 1);
        assert!(dst.pixel(1, 0).0 >= 254);
    }

    #[test]
    fn empty_source_gives_black() {
        let dst = resize_frame(&FrameBuffer::new(0, 0), 3, 2).unwrap();
        assert!(dst.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn inconsistent_source_is_rejected() {
        let mut src = FrameBuffer::new(4, 4);
        src.data.pop();
        assert!(resize_frame(&src, 2, 2).is_err());
    }

    #[test]
    fn cell_aspect_doubles_height() {
        assert_eq!(pixel_size_for_cells(10, 7), (10, 14));
    }
}
