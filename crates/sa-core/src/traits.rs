use std::sync::Arc;

use crate::frame::FrameBuffer;

/// Producteur de frames RGBA pour le rasterizer.
///
/// Deux familles : les scènes animées (une frame neuve par tick) et les
/// images fixes (toujours la même frame, partagée par `Arc`).
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sa_core::frame::FrameBuffer;
/// use sa_core::traits::Source;
///
/// struct Solid(Arc<FrameBuffer>);
/// impl Source for Solid {
///     fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> { Some(Arc::clone(&self.0)) }
///     fn native_size(&self) -> (u32, u32) { (self.0.width, self.0.height) }
///     fn is_live(&self) -> bool { false }
/// }
///
/// let mut src = Solid(Arc::new(FrameBuffer::new(4, 2)));
/// assert_eq!(src.next_frame().map(|f| f.width), Some(4));
/// assert_eq!(src.native_size(), (4, 2));
/// ```
pub trait Source: Send + 'static {
    /// Frame suivante, sans bloquer.
    ///
    /// `None` quand aucun buffer n'est libre : l'appelant garde sa frame
    /// précédente et réessaie au tick suivant.
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>>;

    /// Taille de rendu en pixels, avant tout downsampling.
    fn native_size(&self) -> (u32, u32);

    /// `true` pour une scène animée, `false` pour une image fixe.
    fn is_live(&self) -> bool;
}
