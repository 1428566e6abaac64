pub mod canvas;
pub mod kaleidoscope;
pub mod lissajous;
pub mod metaballs;
pub mod morph;
pub mod noise_field;
pub mod particles;
pub mod torus;

use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sa_core::config::{AnimationKind, RenderConfig, SceneConfig};
use sa_core::frame::FrameBuffer;
use sa_core::traits::Source;

/// Capacité commune à toutes les animations.
///
/// Le cycle de vie est `setup` → (`update` → `render`)* → `cleanup`.
/// `setup` peut être rappelé à tout moment pour changer de résolution.
pub trait Animation: Send {
    /// Nom lisible pour le debug/UI.
    fn name(&self) -> &'static str;

    /// Prépare l'état pour une sortie `width × height`.
    fn setup(&mut self, width: u32, height: u32);

    /// Avance l'état de `dt` secondes, modulé par `scene.speed`.
    fn update(&mut self, dt: f32, scene: &SceneConfig);

    /// Dessine l'état courant dans `frame` (opaque, toutes les cases écrites).
    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig);

    /// Libère les ressources propres à l'animation.
    fn cleanup(&mut self) {}

    /// Tire de nouveaux paramètres internes dans des plages raisonnables.
    fn randomize(&mut self, rng: &mut dyn RngCore);
}

/// Table de correspondance genre → animation.
///
/// # Example
/// ```
/// use sa_core::config::AnimationKind;
/// use sa_source::scene::create_animation;
/// for kind in AnimationKind::ALL {
///     assert_eq!(create_animation(kind).name(), kind.name());
/// }
/// ```
#[must_use]
pub fn create_animation(kind: AnimationKind) -> Box<dyn Animation> {
    match kind {
        AnimationKind::Torus => Box::new(torus::Torus::default()),
        AnimationKind::Noise => Box::new(noise_field::NoiseField::default()),
        AnimationKind::Particles => Box::new(particles::Particles::default()),
        AnimationKind::Kaleidoscope => Box::new(kaleidoscope::Kaleidoscope::default()),
        AnimationKind::Morph => Box::new(morph::Morph::default()),
        AnimationKind::Metaballs => Box::new(metaballs::Metaballs::default()),
        AnimationKind::Lissajous => Box::new(lissajous::Lissajous::default()),
    }
}

/// Commandes envoyées par l'UI au thread de la scène.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneCommand {
    /// Nouveaux paramètres internes, tirés depuis cette graine.
    Randomize(u64),
    /// Nouvelle résolution de rendu.
    Resize(u32, u32),
}

/// Source animée : fait tourner une [`Animation`] et publie ses frames.
///
/// Lit un instantané de config à chaque frame ; change d'animation quand
/// `scene.animation` change. Les buffers viennent d'un pool recyclé.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use arc_swap::ArcSwap;
/// use sa_core::config::RenderConfig;
/// use sa_core::traits::Source;
/// use sa_source::scene::SceneSource;
///
/// let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
/// let mut source = SceneSource::new(64, 32, config, 7);
/// let frame = source.next_frame().unwrap();
/// assert_eq!((frame.width, frame.height), (64, 32));
/// ```
pub struct SceneSource {
    width: u32,
    height: u32,
    pool: Vec<Arc<FrameBuffer>>,
    animation: Box<dyn Animation>,
    kind: AnimationKind,
    config: Arc<ArcSwap<RenderConfig>>,
    rng: StdRng,
    frame_count: u64,
}

const POOL_SIZE: usize = 6;

impl SceneSource {
    /// Create a scene source rendering at `width × height`.
    #[must_use]
    pub fn new(width: u32, height: u32, config: Arc<ArcSwap<RenderConfig>>, seed: u64) -> Self {
        let kind = config.load().scene.animation;
        let mut animation = create_animation(kind);
        animation.setup(width, height);
        log::info!("Scène '{}' initialisée ({width}×{height})", animation.name());

        Self {
            width,
            height,
            pool: make_pool(width, height),
            animation,
            kind,
            config,
            rng: StdRng::seed_from_u64(seed),
            frame_count: 0,
        }
    }

    /// Active animation kind.
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// Frames produced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Apply a command from the UI.
    pub fn handle_command(&mut self, cmd: SceneCommand) {
        match cmd {
            SceneCommand::Randomize(seed) => {
                self.rng = StdRng::seed_from_u64(seed);
                self.animation.randomize(&mut self.rng);
                log::debug!("Scène '{}' randomisée (graine {seed})", self.animation.name());
            }
            SceneCommand::Resize(width, height) => {
                if (width, height) != (self.width, self.height) {
                    self.width = width;
                    self.height = height;
                    self.pool = make_pool(width, height);
                    self.animation.setup(width, height);
                    log::debug!("Scène redimensionnée : {width}×{height}");
                }
            }
        }
    }

    fn switch_animation(&mut self, kind: AnimationKind) {
        self.animation.cleanup();
        self.animation = create_animation(kind);
        self.animation.setup(self.width, self.height);
        self.kind = kind;
        log::info!("Animation active : {}", self.animation.name());
    }
}

fn make_pool(width: u32, height: u32) -> Vec<Arc<FrameBuffer>> {
    (0..POOL_SIZE)
        .map(|_| Arc::new(FrameBuffer::new(width, height)))
        .collect()
}

impl Source for SceneSource {
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        let config = self.config.load_full();
        if config.scene.animation != self.kind {
            self.switch_animation(config.scene.animation);
        }

        let dt = 1.0 / config.target_fps.max(1) as f32;
        self.animation.update(dt, &config.scene);

        // Zero-Alloc: slot libre du pool (plus aucun lecteur).
        let free_idx = self
            .pool
            .iter()
            .position(|a| Arc::strong_count(a) == 1)?;
        let fb = Arc::get_mut(&mut self.pool[free_idx])?;
        self.animation.render(fb, &config.scene);

        self.frame_count += 1;
        Some(Arc::clone(&self.pool[free_idx]))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        true
    }
}

impl Drop for SceneSource {
    fn drop(&mut self) {
        self.animation.cleanup();
    }
}
