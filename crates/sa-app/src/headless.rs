use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use sa_ascii::rasterizer::Rasterizer;
use sa_core::config::RenderConfig;
use sa_core::frame::{AsciiGrid, FrameBuffer};
use sa_core::traits::Source;
use sa_source::image::ImageSource;
use sa_source::resize::{Resizer, pixel_size_for_cells};
use sa_source::scene::SceneSource;

/// Paramètres du rendu sans terminal.
pub struct HeadlessOptions<'a> {
    /// Nombre de ticks à rendre.
    pub frames: u32,
    /// Largeur de la grille en caractères.
    pub cols: u32,
    /// Hauteur de la grille en lignes.
    pub rows: u32,
    /// Graine de la scène.
    pub seed: u64,
    /// Image fixe à la place d'une scène.
    pub image: Option<&'a Path>,
    /// Fichier de sortie ; stdout si absent.
    pub out: Option<&'a Path>,
}

/// Rend `opts.frames` ticks en texte vers stdout ou `opts.out`.
///
/// # Errors
/// Returns an error if the source, the output, or a rasterization fails.
pub fn run(config: &Arc<ArcSwap<RenderConfig>>, opts: &HeadlessOptions<'_>) -> Result<()> {
    let mut source: Box<dyn Source> = match opts.image {
        Some(path) => Box::new(ImageSource::new(path)?),
        None => {
            let (w, h) = pixel_size_for_cells(opts.cols, opts.rows);
            Box::new(SceneSource::new(w, h, Arc::clone(config), opts.seed))
        }
    };

    let written = match opts.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Impossible de créer {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let n = render_frames(source.as_mut(), config, opts, &mut out)?;
            out.flush()?;
            n
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let n = render_frames(source.as_mut(), config, opts, &mut out)?;
            out.flush()?;
            n
        }
    };
    log::info!("{written} frames écrites ({}×{})", opts.cols, opts.rows);
    Ok(())
}

/// Core loop: pull, downsample, rasterize, write. Returns frames written.
///
/// Frames are separated by one blank line; the last frame ends with `\n`.
///
/// # Errors
/// Returns an error on invalid config, bad frame dimensions, or IO failure.
pub fn render_frames<W: Write>(
    source: &mut dyn Source,
    config: &ArcSwap<RenderConfig>,
    opts: &HeadlessOptions<'_>,
    out: &mut W,
) -> Result<u32> {
    let mut rasterizer = Rasterizer::new(&config.load().charset)?;
    let mut resizer = Resizer::new();
    let mut resized = FrameBuffer::new(opts.cols, opts.rows);
    let mut grid = AsciiGrid::new(opts.cols, opts.rows);
    let mut written = 0;

    for i in 0..opts.frames {
        let Some(frame) = source.next_frame() else {
            log::warn!("Frame {i} sautée : source indisponible");
            continue;
        };
        let snapshot = config.load();
        resizer.resize_into(&frame, &mut resized)?;
        rasterizer.process(&resized, &snapshot, &mut grid)?;

        if written > 0 {
            out.write_all(b"\n")?;
        }
        out.write_all(grid.to_text().as_bytes())?;
        out.write_all(b"\n")?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::config::AnimationKind;

    fn opts(frames: u32, cols: u32, rows: u32) -> HeadlessOptions<'static> {
        HeadlessOptions {
            frames,
            cols,
            rows,
            seed: 3,
            image: None,
            out: None,
        }
    }

    #[test]
    fn image_frames_are_separated_by_blank_lines() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.fill((255, 255, 255, 255));
        let mut source = ImageSource::from_frame(fb);
        let mut config = RenderConfig::default();
        config.charset = " #".into();
        let config = ArcSwap::from_pointee(config);

        let mut out = Vec::new();
        let n = render_frames(&mut source, &config, &opts(2, 4, 2), &mut out).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "####\n####\n\n####\n####\n");
    }

    #[test]
    fn scene_frames_have_requested_grid_size() {
        let mut config = RenderConfig::default();
        config.scene.animation = AnimationKind::Noise;
        let shared = Arc::new(ArcSwap::from_pointee(config));
        let mut source = SceneSource::new(30, 20, Arc::clone(&shared), 3);

        let mut out = Vec::new();
        render_frames(&mut source, &shared, &opts(3, 30, 10), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let frames: Vec<&str> = text.trim_end_matches('\n').split("\n\n").collect();
        assert_eq!(frames.len(), 3);
        for frame in frames {
            let rows: Vec<&str> = frame.split('\n').collect();
            assert_eq!(rows.len(), 10);
            assert!(rows.iter().all(|r| r.chars().count() == 30));
        }
    }

    #[test]
    fn same_seed_gives_identical_output() {
        let render = || {
            let shared = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
            let mut source = SceneSource::new(20, 16, Arc::clone(&shared), 9);
            let mut out = Vec::new();
            render_frames(&mut source, &shared, &opts(2, 20, 8), &mut out).unwrap();
            out
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut source = ImageSource::from_frame(FrameBuffer::new(2, 2));
        let mut config = RenderConfig::default();
        config.contrast = 0.0;
        let config = ArcSwap::from_pointee(config);
        let mut out = Vec::new();
        assert!(render_frames(&mut source, &config, &opts(1, 2, 2), &mut out).is_err());
        assert!(out.is_empty());
    }
}
