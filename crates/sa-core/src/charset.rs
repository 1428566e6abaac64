use crate::error::CoreError;

/// 70 caractères : Paul Bourke, résolution maximale.
pub const CHARSET_DENSE: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// 15 caractères : défaut, bon équilibre.
pub const CHARSET_STANDARD: &str = " .,:;i1tfLCG08@";

/// 10 caractères : compact, bon contraste.
pub const CHARSET_SIMPLE: &str = " .:-=+*#%@";

/// Blocs Unicode : pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Deux niveaux.
pub const CHARSET_BINARY: &str = "01";

/// Preset names in cycling order. Index 0 is the default.
pub const PRESET_NAMES: &[&str] = &["standard", "dense", "simple", "blocks", "binary"];

/// Look up a named charset preset (case-insensitive).
///
/// # Errors
/// Returns [`CoreError::InvalidConfiguration`] for an unknown name.
///
/// # Example
/// ```
/// use sa_core::charset::{preset, CHARSET_BLOCKS};
/// assert_eq!(preset("Blocks").unwrap(), CHARSET_BLOCKS);
/// assert!(preset("nope").is_err());
/// ```
pub fn preset(name: &str) -> Result<&'static str, CoreError> {
    match name.to_ascii_lowercase().as_str() {
        "standard" => Ok(CHARSET_STANDARD),
        "dense" => Ok(CHARSET_DENSE),
        "simple" => Ok(CHARSET_SIMPLE),
        "blocks" => Ok(CHARSET_BLOCKS),
        "binary" => Ok(CHARSET_BINARY),
        _ => Err(CoreError::config(format!(
            "preset inconnu '{name}' (connus : {})",
            PRESET_NAMES.join(", ")
        ))),
    }
}

/// Ordered character ramp, darkest → brightest.
///
/// Never empty: construction fails on an empty charset.
///
/// # Example
/// ```
/// use sa_core::charset::CharacterRamp;
/// let ramp = CharacterRamp::new(" .:#@").unwrap();
/// assert_eq!(ramp.select(0.0), ' ');
/// assert_eq!(ramp.select(1.0), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterRamp {
    chars: Vec<char>,
}

impl CharacterRamp {
    /// Build a ramp from a charset ordered darkest→brightest.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] if `charset` is empty.
    pub fn new(charset: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = charset.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::config("la rampe de caractères est vide"));
        }
        Ok(Self { chars })
    }

    /// Number of characters in the ramp (always ≥ 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Ramp characters, darkest first.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Index selected for `brightness`: `floor(b × (N-1))`, clamped to `[0, N-1]`.
    ///
    /// Non-finite input selects index 0.
    ///
    /// # Example
    /// ```
    /// use sa_core::charset::CharacterRamp;
    /// let ramp = CharacterRamp::new(" .:#@").unwrap();
    /// assert_eq!(ramp.index_of(0.5), 2);
    /// assert_eq!(ramp.index_of(0.74), 2);
    /// assert_eq!(ramp.index_of(7.0), 4);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_of(&self, brightness: f32) -> usize {
        let last = self.chars.len() - 1;
        if !brightness.is_finite() || brightness <= 0.0 {
            return 0;
        }
        ((brightness * last as f32).floor() as usize).min(last)
    }

    /// Map a brightness value in [0, 1] to a ramp character.
    #[inline(always)]
    #[must_use]
    pub fn select(&self, brightness: f32) -> char {
        self.chars[self.index_of(brightness)]
    }

    /// True if `ch` is one of the ramp characters.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }
}
