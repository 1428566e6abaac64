use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use sa_core::config::RenderConfig;
use sa_core::frame::FrameBuffer;
use sa_core::traits::Source;
use sa_source::image::ImageSource;
use sa_source::scene::{SceneCommand, SceneSource};

/// Résultat du démarrage d'une source visuelle.
pub struct SourceHandle {
    /// Première frame disponible immédiatement (images statiques).
    pub initial_frame: Option<Arc<FrameBuffer>>,
    /// Frames produites par le thread de scène.
    pub frame_rx: Option<flume::Receiver<Arc<FrameBuffer>>>,
    /// Commandes vers le thread de scène (randomize, resize).
    pub command_tx: Option<flume::Sender<SceneCommand>>,
    /// Nom affiché dans la sidebar.
    pub label: String,
}

/// Load a still image as the visual source.
///
/// # Errors
/// Returns an error if the image cannot be loaded.
pub fn start_image(path: &Path) -> Result<SourceHandle> {
    let mut source = ImageSource::new(path)?;
    let label = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.display().to_string(), String::from);
    Ok(SourceHandle {
        initial_frame: source.next_frame(),
        frame_rx: None,
        command_tx: None,
        label,
    })
}

/// Spawn the scene thread rendering at `width × height` pixels.
///
/// The thread paces itself on `target_fps` from the live config and stops
/// once the frame receiver is dropped.
///
/// # Errors
/// Returns an error if the thread cannot be spawned.
pub fn start_scene(
    config: &Arc<ArcSwap<RenderConfig>>,
    width: u32,
    height: u32,
    seed: u64,
) -> Result<SourceHandle> {
    let (frame_tx, frame_rx) = flume::bounded(3);
    let (cmd_tx, cmd_rx) = flume::bounded::<SceneCommand>(16);
    let config = Arc::clone(config);
    let label = config.load().scene.animation.to_string();

    std::thread::Builder::new()
        .name("scene_generator".into())
        .spawn(move || {
            let mut source = SceneSource::new(width, height, Arc::clone(&config), seed);
            loop {
                let start = Instant::now();
                for cmd in cmd_rx.try_iter() {
                    source.handle_command(cmd);
                }
                if let Some(frame) = source.next_frame()
                    && frame_tx.send(frame).is_err()
                {
                    break; // receiver dropped
                }
                let fps = config.load().target_fps.max(1);
                let frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));
                let sleep_dur = frame_duration.saturating_sub(start.elapsed());
                if !sleep_dur.is_zero() {
                    std::thread::sleep(sleep_dur);
                }
            }
            log::debug!("Thread de scène terminé après {} frames", source.frame_count());
        })?;

    Ok(SourceHandle {
        initial_frame: None,
        frame_rx: Some(frame_rx),
        command_tx: Some(cmd_tx),
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_thread_delivers_frames_of_requested_size() {
        let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
        let handle = start_scene(&config, 24, 12, 1).unwrap();
        let rx = handle.frame_rx.unwrap();
        let frame = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!((frame.width, frame.height), (24, 12));
        assert_eq!(handle.label, "torus");
    }

    #[test]
    fn resize_command_reaches_the_thread() {
        let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
        let handle = start_scene(&config, 8, 8, 1).unwrap();
        let rx = handle.frame_rx.unwrap();
        handle
            .command_tx
            .unwrap()
            .send(SceneCommand::Resize(16, 10))
            .unwrap();
        let resized = (0..50)
            .filter_map(|_| rx.recv_timeout(Duration::from_secs(5)).ok())
            .any(|f| (f.width, f.height) == (16, 10));
        assert!(resized);
    }

    #[test]
    fn missing_image_is_an_error() {
        assert!(start_image(Path::new("nope/missing.png")).is_err());
    }
}
