/// Frame sources for scenascii: still images and animated scenes.

pub mod image;
pub mod resize;
pub mod scene;
