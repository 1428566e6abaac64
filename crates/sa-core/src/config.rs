use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{self, CharacterRamp};
use crate::error::CoreError;

/// Configuration complète du rendu, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
/// Consommée comme un instantané immuable par frame.
///
/// # Example
/// ```
/// use sa_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.target_fps, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    // === Conversion ===
    /// Charset du plus sombre au plus clair.
    pub charset: String,
    /// Nom du preset d'origine du charset ("custom" si édité à la main).
    pub charset_preset: String,
    /// Contraste, pivot autour du gris moyen. Strictement positif.
    pub contrast: f32,
    /// Seuil de luminosité [0.0, 1.0].
    pub brightness_threshold: f32,
    /// Politique d'application du seuil.
    pub threshold_policy: ThresholdPolicy,
    /// Inverser la luminance (pour fond clair).
    pub invert: bool,

    // === Affichage ===
    /// Activer la couleur truecolor dans le terminal.
    pub color_enabled: bool,
    /// FPS cible.
    pub target_fps: u32,

    // === Scène ===
    /// Paramètres de l'animation active.
    pub scene: SceneConfig,
}

/// How `brightness_threshold` is applied by the luminance mapper.
///
/// # Example
/// ```
/// use sa_core::config::ThresholdPolicy;
/// assert_eq!(ThresholdPolicy::default(), ThresholdPolicy::Cutoff);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// Values below the threshold become 0 (dense noise suppression).
    #[default]
    Cutoff,
    /// The threshold shifts every value by `threshold - 0.5` before clamping.
    Offset,
}

/// Per-scene parameters shared by every animation.
///
/// Each animation interprets `count` and `shape` in its own way.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SceneConfig {
    /// Animation active.
    pub animation: AnimationKind,
    /// Vitesse d'animation [0.1, 5.0]. 1.0 = nominale.
    pub speed: f32,
    /// Teinte RGB appliquée au rendu.
    pub color: (u8, u8, u8),
    /// Nombre d'éléments (particules, metaballs, octaves...) [1, 512].
    pub count: u32,
    /// Forme (morph, kaléidoscope).
    pub shape: ShapeKind,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            animation: AnimationKind::Torus,
            speed: 1.0,
            color: (255, 255, 255),
            count: 64,
            shape: ShapeKind::Circle,
        }
    }
}

/// The fixed set of animations.
///
/// # Example
/// ```
/// use sa_core::config::AnimationKind;
/// let kind: AnimationKind = "metaballs".parse().unwrap();
/// assert_eq!(kind, AnimationKind::Metaballs);
/// assert_eq!(AnimationKind::Lissajous.next(), AnimationKind::Torus);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Tore en rotation, éclairé.
    #[default]
    Torus,
    /// Champ de bruit de Perlin animé.
    Noise,
    /// Système de particules.
    Particles,
    /// Motif kaléidoscopique.
    Kaleidoscope,
    /// Morphing entre deux formes.
    Morph,
    /// Metaballs.
    Metaballs,
    /// Courbes de Lissajous.
    Lissajous,
}

impl AnimationKind {
    /// All kinds in cycling order.
    pub const ALL: [Self; 7] = [
        Self::Torus,
        Self::Noise,
        Self::Particles,
        Self::Kaleidoscope,
        Self::Morph,
        Self::Metaballs,
        Self::Lissajous,
    ];

    /// Lowercase name used on the CLI and in the UI.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Torus => "torus",
            Self::Noise => "noise",
            Self::Particles => "particles",
            Self::Kaleidoscope => "kaleidoscope",
            Self::Morph => "morph",
            Self::Metaballs => "metaballs",
            Self::Lissajous => "lissajous",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|&k| k == self).unwrap_or(0)
    }

    /// Next kind, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous kind, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                CoreError::config(format!(
                    "animation inconnue '{s}' (connues : {})",
                    names.join(", ")
                ))
            })
    }
}

/// Shapes used by the morph and kaleidoscope scenes.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ShapeKind {
    /// Cercle.
    #[default]
    Circle,
    /// Carré.
    Square,
    /// Triangle équilatéral.
    Triangle,
    /// Étoile à cinq branches.
    Star,
}

impl ShapeKind {
    /// All shapes in cycling order.
    pub const ALL: [Self; 4] = [Self::Circle, Self::Square, Self::Triangle, Self::Star];

    /// Lowercase name for display.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Star => "star",
        }
    }

    /// Next shape, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: charset::CHARSET_STANDARD.to_string(),
            charset_preset: charset::PRESET_NAMES[0].to_string(),
            contrast: 1.0,
            brightness_threshold: 0.0,
            threshold_policy: ThresholdPolicy::Cutoff,
            invert: false,
            color_enabled: true,
            target_fps: 30,
            scene: SceneConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Check the fields the rasterizer contract depends on.
    ///
    /// Contract fields are rejected, never clamped: an empty charset,
    /// a non-positive or non-finite contrast, or a threshold outside [0, 1].
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] describing the first bad field.
    ///
    /// # Example
    /// ```
    /// use sa_core::config::RenderConfig;
    /// let mut config = RenderConfig::default();
    /// config.contrast = 0.0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.charset.is_empty() {
            return Err(CoreError::config("la rampe de caractères est vide"));
        }
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(CoreError::config(format!(
                "contraste {} : doit être strictement positif",
                self.contrast
            )));
        }
        if !(0.0..=1.0).contains(&self.brightness_threshold) {
            return Err(CoreError::config(format!(
                "seuil {} : doit être dans [0, 1]",
                self.brightness_threshold
            )));
        }
        Ok(())
    }

    /// Build the character ramp for the current charset.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] if the charset is empty.
    pub fn ramp(&self) -> Result<CharacterRamp, CoreError> {
        CharacterRamp::new(&self.charset)
    }

    /// Switch to a named charset preset.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfiguration`] for an unknown preset.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), CoreError> {
        self.charset = charset::preset(name)?.to_string();
        self.charset_preset = name.to_ascii_lowercase();
        log::debug!(
            "Preset '{}' : {} caractères",
            self.charset_preset,
            self.charset.chars().count()
        );
        Ok(())
    }

    /// Clamp display and scene fields to their UI ranges.
    ///
    /// Contract fields are left alone; see [`RenderConfig::validate`].
    pub fn clamp_all(&mut self) {
        self.target_fps = self.target_fps.clamp(15, 120);
        self.scene.speed = self.scene.speed.clamp(0.1, 5.0);
        self.scene.count = self.scene.count.clamp(1, 512);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    scene: Option<SceneSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    preset: Option<String>,
    charset: Option<String>,
    contrast: Option<f32>,
    brightness_threshold: Option<f32>,
    threshold_policy: Option<ThresholdPolicy>,
    invert: Option<bool>,
    color_enabled: Option<bool>,
    target_fps: Option<u32>,
}

/// Scene section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct SceneSection {
    animation: Option<String>,
    speed: Option<f32>,
    color: Option<[u8; 3]>,
    count: Option<u32>,
    shape: Option<ShapeKind>,
}

/// Parse TOML text and merge it over the defaults.
///
/// An explicit `charset` wins over `preset`.
///
/// # Errors
/// Returns an error if the text cannot be parsed or the result is invalid.
///
/// # Example
/// ```
/// use sa_core::config::parse_config;
/// let config = parse_config("[render]\ncontrast = 2.0\n").unwrap();
/// assert_eq!(config.contrast, 2.0);
/// assert!(parse_config("[render]\ncontrast = -1.0\n").is_err());
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(ref name) = r.preset {
            config.apply_preset(name)?;
        }
        if let Some(v) = r.charset {
            config.charset = v;
            config.charset_preset = "custom".into();
        }
        if let Some(v) = r.contrast {
            config.contrast = v;
        }
        if let Some(v) = r.brightness_threshold {
            config.brightness_threshold = v;
        }
        if let Some(v) = r.threshold_policy {
            config.threshold_policy = v;
        }
        if let Some(v) = r.invert {
            config.invert = v;
        }
        if let Some(v) = r.color_enabled {
            config.color_enabled = v;
        }
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
    }

    if let Some(s) = file.scene {
        if let Some(ref name) = s.animation {
            config.scene.animation = name.parse()?;
        }
        if let Some(v) = s.speed {
            config.scene.speed = v;
        }
        if let Some([r, g, b]) = s.color {
            config.scene.color = (r, g, b);
        }
        if let Some(v) = s.count {
            config.scene.count = v;
        }
        if let Some(v) = s.shape {
            config.scene.shape = v;
        }
    }

    config.clamp_all();
    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use sa_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Config invalide dans {}", path.display()))?;
    log::debug!(
        "Config lue depuis {} (preset {}, animation {})",
        path.display(),
        config.charset_preset,
        config.scene.animation
    );
    Ok(config)
}
