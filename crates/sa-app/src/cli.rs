use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sa_core::config::{AnimationKind, RenderConfig};

/// scenascii : scènes procédurales rendues en ASCII dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Animation de départ : torus, noise, particles, kaleidoscope, morph,
    /// metaballs, lissajous.
    #[arg(long)]
    pub animation: Option<String>,

    /// Source visuelle : chemin vers une image (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Fichier de configuration TOML.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Rampe de caractères prédéfinie : standard, dense, simple, blocks, binary.
    #[arg(long)]
    pub preset: Option<String>,

    /// FPS cible.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Inverser la luminosité.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Contraste (> 0).
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Seuil de luminosité dans [0, 1].
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Graine des tirages aléatoires (scènes, randomize).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Désactiver la couleur.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Mode headless : rend N frames en texte puis quitte.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Largeur de la grille en mode headless.
    #[arg(long, default_value_t = 80)]
    pub width: u32,

    /// Hauteur de la grille en mode headless.
    #[arg(long, default_value_t = 24)]
    pub height: u32,

    /// Fichier de sortie du mode headless (stdout par défaut).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate that at most one visual source is provided.
    ///
    /// # Errors
    /// Returns an error if both `--animation` and `--image` are given.
    pub fn validate_source(&self) -> Result<()> {
        if self.animation.is_some() && self.image.is_some() {
            anyhow::bail!("Une seule source visuelle à la fois : --animation OU --image.");
        }
        Ok(())
    }

    /// Apply command-line overrides on top of a loaded config.
    ///
    /// # Errors
    /// Returns an error for unknown animation/preset names or if the result
    /// fails validation.
    pub fn apply_overrides(&self, config: &mut RenderConfig) -> Result<()> {
        if let Some(ref name) = self.animation {
            config.scene.animation = name
                .parse::<AnimationKind>()
                .with_context(|| format!("--animation {name}"))?;
        }
        if let Some(ref name) = self.preset {
            config
                .apply_preset(name)
                .with_context(|| format!("--preset {name}"))?;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if self.invert {
            config.invert = true;
        }
        if let Some(contrast) = self.contrast {
            config.contrast = contrast;
        }
        if let Some(threshold) = self.threshold {
            config.brightness_threshold = threshold;
        }
        if self.no_color {
            config.color_enabled = false;
        }
        config.clamp_all();
        config.validate().context("Configuration invalide")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scenascii").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!((cli.width, cli.height), (80, 24));
        assert!(cli.frames.is_none());
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn overrides_are_applied() {
        let cli = parse(&[
            "--animation",
            "Metaballs",
            "--preset",
            "binary",
            "--fps",
            "500",
            "--invert",
            "--contrast",
            "1.5",
            "--threshold",
            "0.2",
            "--no-color",
        ]);
        let mut config = RenderConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.scene.animation, AnimationKind::Metaballs);
        assert_eq!(config.charset, "01");
        assert_eq!(config.charset_preset, "binary");
        assert_eq!(config.target_fps, 120);
        assert!(config.invert);
        assert!(!config.color_enabled);
        assert!((config.contrast - 1.5).abs() < f32::EPSILON);
        assert!((config.brightness_threshold - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn contract_violations_are_rejected() {
        let mut config = RenderConfig::default();
        assert!(parse(&["--contrast", "0"]).apply_overrides(&mut config).is_err());
        assert!(parse(&["--threshold", "1.5"]).apply_overrides(&mut config).is_err());
        assert!(parse(&["--animation", "donut"]).apply_overrides(&mut config).is_err());
        assert!(parse(&["--preset", "nope"]).apply_overrides(&mut config).is_err());
    }

    #[test]
    fn two_sources_are_rejected() {
        assert!(parse(&["--animation", "torus", "--image", "a.png"]).validate_source().is_err());
        assert!(parse(&["--image", "a.png"]).validate_source().is_ok());
    }
}
