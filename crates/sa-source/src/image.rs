use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sa_core::frame::FrameBuffer;
use sa_core::traits::Source;

/// Image fixe décodée une fois ; chaque tick partage le même `Arc`.
///
/// # Example
/// ```no_run
/// use sa_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("photo.png")).unwrap();
/// ```
pub struct ImageSource {
    frame: Arc<FrameBuffer>,
}

impl ImageSource {
    /// Decode `path` into an RGBA8 frame.
    ///
    /// # Errors
    /// Returns an error if the file is missing or not a supported image.
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Self {
            frame: Arc::new(load_image(path)?),
        })
    }

    /// Serve an in-memory frame (headless tests, generated stills).
    #[must_use]
    pub fn from_frame(frame: FrameBuffer) -> Self {
        Self {
            frame: Arc::new(frame),
        }
    }
}

impl Source for ImageSource {
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        Some(Arc::clone(&self.frame))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Décode une image (PNG, JPEG, BMP, GIF) en RGBA8.
///
/// # Errors
/// Returns an error if the image cannot be loaded or decoded.
///
/// # Example
/// ```no_run
/// use sa_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Image chargée : {} ({width}×{height})", path.display());
    Ok(FrameBuffer::from_rgba(width, height, rgba.into_raw())?)
}
