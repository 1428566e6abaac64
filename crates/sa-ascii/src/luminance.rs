use sa_core::config::{RenderConfig, ThresholdPolicy};

/// Perceptual luma of an RGB pixel, normalized to [0, 1].
///
/// Rec. 601 weights (0.299, 0.587, 0.114), computed in integers so that
/// pure white maps to exactly 1.0.
///
/// # Example
/// ```
/// use sa_ascii::luminance::luma;
/// assert_eq!(luma(0, 0, 0), 0.0);
/// assert_eq!(luma(255, 255, 255), 1.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    let weighted = u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114;
    weighted as f32 / 255_000.0
}

/// Map one pixel to a brightness in [0, 1].
///
/// 1. luma, 2. contrast around mid-gray, 3. threshold (per policy),
/// 4. clamp, 5. optional inversion. Alpha is ignored.
///
/// # Example
/// ```
/// use sa_core::config::RenderConfig;
/// use sa_ascii::luminance::brightness;
/// let config = RenderConfig::default();
/// assert_eq!(brightness(0, 0, 0, &config), 0.0);
/// assert_eq!(brightness(255, 255, 255, &config), 1.0);
/// ```
#[inline(always)]
#[must_use]
pub fn brightness(r: u8, g: u8, b: u8, config: &RenderConfig) -> f32 {
    let adjusted = apply_contrast(luma(r, g, b), config.contrast);
    let thresholded = apply_threshold(
        adjusted,
        config.brightness_threshold,
        config.threshold_policy,
    );
    let value = thresholded.clamp(0.0, 1.0);
    if config.invert { 1.0 - value } else { value }
}

/// Contrast pivots around 0.5.
#[inline(always)]
fn apply_contrast(value: f32, contrast: f32) -> f32 {
    (value - 0.5) * contrast + 0.5
}

#[inline(always)]
fn apply_threshold(value: f32, threshold: f32, policy: ThresholdPolicy) -> f32 {
    match policy {
        ThresholdPolicy::Cutoff => {
            if value < threshold {
                0.0
            } else {
                value
            }
        }
        ThresholdPolicy::Offset => value + threshold - 0.5,
    }
}
