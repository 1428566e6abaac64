use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use sa_core::config::{RenderConfig, load_config};

/// Relit `path` et publie un nouvel instantané si le fichier est valide.
///
/// Retourne `false` (et garde l'ancienne config) en cas d'erreur.
pub fn reload(path: &Path, config: &ArcSwap<RenderConfig>) -> bool {
    match load_config(path) {
        Ok(new_config) => {
            config.store(Arc::new(new_config));
            log::info!("Config rechargée depuis {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Erreur de rechargement config : {e:#}");
            false
        }
    }
}

/// Surveille le fichier config et met à jour l'ArcSwap à chaque écriture.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    config: &Arc<ArcSwap<RenderConfig>>,
) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        {
            reload(&path, &config);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    log::debug!("Surveillance de {}", config_path.display());
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::config::AnimationKind;
    use tempfile::TempDir;

    fn temp_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenascii.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn valid_file_replaces_snapshot() {
        let (_dir, path) = temp_config("[scene]\nanimation = \"lissajous\"\n");
        let config = ArcSwap::from_pointee(RenderConfig::default());
        assert!(reload(&path, &config));
        assert_eq!(config.load().scene.animation, AnimationKind::Lissajous);
    }

    #[test]
    fn invalid_file_keeps_previous_snapshot() {
        let (_dir, path) = temp_config("[render]\ncontrast = -2.0\n");
        let config = ArcSwap::from_pointee(RenderConfig::default());
        assert!(!reload(&path, &config));
        assert_eq!(**config.load(), RenderConfig::default());
    }

    #[test]
    fn watcher_starts_on_existing_file() {
        let (_dir, path) = temp_config("");
        let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
        assert!(spawn_config_watcher(&path, &config).is_ok());
    }

    #[test]
    fn temp_config_is_removed_with_its_guard() {
        let (dir, path) = temp_config("[render]\ninvert = true\n");
        let config = ArcSwap::from_pointee(RenderConfig::default());
        assert!(reload(&path, &config));
        assert!(config.load().invert);
        dir.close().unwrap();
        assert!(!path.exists());
    }
}
