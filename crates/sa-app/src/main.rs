use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use sa_core::config::RenderConfig;

pub mod app;
pub mod cli;
pub mod headless;
pub mod hotreload;
pub mod pipeline;

/// Taille de rendu de la scène avant le premier resize terminal.
const INITIAL_SCENE_SIZE: (u32, u32) = (160, 96);

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging (stderr)
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;
    let config = Arc::new(ArcSwap::from_pointee(config));

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Graine : {seed}");

    // 5. Mode headless : pas de terminal, pas de hot-reload
    if let Some(frames) = cli.frames {
        let opts = headless::HeadlessOptions {
            frames,
            cols: cli.width,
            rows: cli.height,
            seed,
            image: cli.image.as_deref(),
            out: cli.out.as_deref(),
        };
        return headless::run(&config, &opts);
    }

    // 6. Hot-reload config (thread interne notify)
    let _watcher = if cli.config.exists() {
        match hotreload::spawn_config_watcher(&cli.config, &config) {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Hot-reload indisponible : {e}");
                None
            }
        }
    } else {
        None
    };

    // 7. Démarrer la source visuelle
    let source = match cli.image {
        Some(ref path) => pipeline::start_image(path)?,
        None => {
            let (w, h) = INITIAL_SCENE_SIZE;
            pipeline::start_scene(&config, w, h, seed)?
        }
    };
    let mut app_instance = app::App::new(config, source, seed)?;

    // 8. Initialiser le terminal ratatui
    let terminal = ratatui::init();

    // 9. Boucle principale
    let result = app_instance.run(terminal);

    // 10. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Load `--config` if present, otherwise fall back to defaults.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        sa_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}
