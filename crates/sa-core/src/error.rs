use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is a deterministic input-contract violation: nothing here is
/// transient, so callers never retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value (empty ramp, bad contrast or threshold, unknown name).
    #[error("Configuration invalide : {0}")]
    InvalidConfiguration(String),

    /// Pixel buffer length does not match `width × height × 4`.
    #[error("Dimensions incohérentes : {width}×{height} attend {expected} octets, reçu {actual}")]
    DimensionMismatch {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidConfiguration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
