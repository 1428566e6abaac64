use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use sa_ascii::rasterizer::Rasterizer;
use sa_core::charset::PRESET_NAMES;
use sa_core::config::{RenderConfig, ShapeKind, ThresholdPolicy};
use sa_core::frame::{AsciiGrid, FrameBuffer};
use sa_render::fps::FpsCounter;
use sa_render::ui::{self, DrawContext, RenderState};
use sa_source::resize::{Resizer, pixel_size_for_cells};
use sa_source::scene::SceneCommand;

use crate::pipeline::SourceHandle;

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Exécution normale.
    Running,
    /// Pause : plus de frames consommées, la dernière reste affichée.
    Paused,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Fermeture au prochain tour de boucle.
    Quitting,
}

/// Main application struct holding all state.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Config courante (lecture via arc-swap depuis tous les threads).
    pub config: Arc<ArcSwap<RenderConfig>>,
    /// Dernière frame source reçue.
    pub current_frame: Option<Arc<FrameBuffer>>,
    /// Grille ASCII pré-allouée, réutilisée chaque frame.
    pub grid: AsciiGrid,
    /// Frame resizée aux dimensions de la grille.
    pub resized_frame: FrameBuffer,
    /// Compteur FPS.
    pub fps_counter: FpsCounter,
    frame_rx: Option<flume::Receiver<Arc<FrameBuffer>>>,
    command_tx: Option<flume::Sender<SceneCommand>>,
    source_label: String,
    /// Dernier terminal size connu (pour détecter les resize).
    terminal_size: (u16, u16),
    rasterizer: Rasterizer,
    resizer: Resizer,
    rng: StdRng,
    /// Frames consécutives au-delà du budget.
    perf_exceed_count: u8,
}

impl App {
    /// Create a new App instance around a started source.
    ///
    /// # Errors
    /// Returns an error if the configured charset is empty.
    pub fn new(
        config: Arc<ArcSwap<RenderConfig>>,
        source: SourceHandle,
        seed: u64,
    ) -> Result<Self> {
        let rasterizer = Rasterizer::new(&config.load().charset)?;
        Ok(Self {
            state: AppState::Running,
            config,
            current_frame: source.initial_frame,
            grid: AsciiGrid::new(0, 0),
            resized_frame: FrameBuffer::new(0, 0),
            fps_counter: FpsCounter::new(60),
            frame_rx: source.frame_rx,
            command_tx: source.command_tx,
            source_label: source.label,
            terminal_size: (0, 0), // Force initial resize trigger
            rasterizer,
            resizer: Resizer::new(),
            rng: StdRng::seed_from_u64(seed),
            perf_exceed_count: 0,
        })
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let target_fps = self.config.load().target_fps.max(1);
            let frame_duration = Duration::from_secs_f64(1.0 / f64::from(target_fps));

            let elapsed = last_frame.elapsed();
            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                if event::poll(frame_duration.saturating_sub(elapsed))? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            self.check_resize()?;

            if self.state != AppState::Paused
                && let Some(ref rx) = self.frame_rx
            {
                // Garder la plus récente, le canal borné régule la source.
                if let Some(frame) = rx.try_iter().last() {
                    self.current_frame = Some(frame);
                }
            }

            self.process_frame();

            let config = self.config.load();
            let ctx = DrawContext {
                grid: &self.grid,
                config: &config,
                fps: &self.fps_counter,
                state: self.render_state(),
                source_label: &self.source_label,
            };
            terminal.draw(|f| ui::draw(f, &ctx))?;

            self.fps_counter.tick();
            self.check_perf(target_fps);
        }

        Ok(())
    }

    /// Resize the current source frame to the grid and rasterize it.
    pub fn process_frame(&mut self) {
        let Some(ref frame) = self.current_frame else {
            return;
        };
        if let Err(e) = self.resizer.resize_into(frame, &mut self.resized_frame) {
            log::warn!("Resize impossible : {e:#}");
            return;
        }
        let config = self.config.load();
        if let Err(e) = self
            .rasterizer
            .process(&self.resized_frame, &config, &mut self.grid)
        {
            log::warn!("Rasterisation refusée : {e}");
        }
    }

    fn render_state(&self) -> RenderState {
        match self.state {
            AppState::Running => RenderState::Running,
            AppState::Paused => RenderState::Paused,
            AppState::Help => RenderState::Help,
            AppState::Quitting => RenderState::Quitting,
        }
    }

    fn check_perf(&mut self, target_fps: u32) {
        if self.fps_counter.over_budget(target_fps) {
            self.perf_exceed_count = self.perf_exceed_count.saturating_add(1);
            if self.perf_exceed_count == 10 {
                log::warn!(
                    "Budget de frame dépassé 10 fois de suite ({:.1}ms, grille {}×{})",
                    self.fps_counter.frame_time_ms,
                    self.grid.width,
                    self.grid.height
                );
            }
        } else {
            self.perf_exceed_count = 0;
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = *event
        {
            self.handle_key(code);
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.state = AppState::Quitting,
            KeyCode::Esc => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Quitting
                };
            }
            KeyCode::Char('?') => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Help
                };
            }
            KeyCode::Char(' ') => {
                self.state = match self.state {
                    AppState::Paused => AppState::Running,
                    _ => AppState::Paused,
                };
            }
            KeyCode::Tab => self.toggle_config(|c| c.scene.animation = c.scene.animation.next()),
            KeyCode::BackTab => {
                self.toggle_config(|c| c.scene.animation = c.scene.animation.prev());
            }
            KeyCode::Char(d @ '1'..='5') => {
                if let Some(n) = d.to_digit(10) {
                    self.set_preset(PRESET_NAMES[n as usize - 1]);
                }
            }
            KeyCode::Char('[') => self.toggle_config(|c| c.contrast = (c.contrast - 0.1).max(0.1)),
            KeyCode::Char(']') => self.toggle_config(|c| c.contrast = (c.contrast + 0.1).min(5.0)),
            KeyCode::Char('-') => self.toggle_config(|c| {
                c.brightness_threshold = (c.brightness_threshold - 0.05).max(0.0);
            }),
            KeyCode::Char('+' | '=') => self.toggle_config(|c| {
                c.brightness_threshold = (c.brightness_threshold + 0.05).min(1.0);
            }),
            KeyCode::Char('t') => self.toggle_config(|c| {
                c.threshold_policy = match c.threshold_policy {
                    ThresholdPolicy::Cutoff => ThresholdPolicy::Offset,
                    ThresholdPolicy::Offset => ThresholdPolicy::Cutoff,
                };
            }),
            KeyCode::Char('i') => self.toggle_config(|c| c.invert = !c.invert),
            KeyCode::Char('c') => self.toggle_config(|c| c.color_enabled = !c.color_enabled),
            KeyCode::Char(',') => self.toggle_config(|c| c.scene.speed -= 0.1),
            KeyCode::Char('.') => self.toggle_config(|c| c.scene.speed += 0.1),
            KeyCode::Char('{') => self.toggle_config(|c| c.scene.count /= 2),
            KeyCode::Char('}') => {
                self.toggle_config(|c| c.scene.count = c.scene.count.saturating_mul(2));
            }
            KeyCode::Char('s') => self.toggle_config(|c| c.scene.shape = c.scene.shape.next()),
            KeyCode::Char('r') => self.randomize(),
            _ => {}
        }
    }

    fn set_preset(&mut self, name: &str) {
        let config = self.config.load();
        let mut new = (**config).clone();
        match new.apply_preset(name) {
            Ok(()) => self.config.store(Arc::new(new)),
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Clone, modifie, publie un nouvel instantané.
    fn toggle_config(&mut self, mutate: impl FnOnce(&mut RenderConfig)) {
        let config = self.config.load();
        let mut new = (**config).clone();
        mutate(&mut new);
        new.clamp_all();
        self.config.store(Arc::new(new));
    }

    /// Nouveaux paramètres de scène aléatoires + randomize de l'animation.
    fn randomize(&mut self) {
        let rng = &mut self.rng;
        let speed = rng.random_range(0.3..2.5);
        let color = (
            rng.random_range(64..=255),
            rng.random_range(64..=255),
            rng.random_range(64..=255),
        );
        let count = rng.random_range(4..=128);
        let shape = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];
        let preset = PRESET_NAMES[rng.random_range(0..PRESET_NAMES.len())];
        let seed = rng.next_u64();

        self.set_preset(preset);
        self.toggle_config(|c| {
            c.scene.speed = speed;
            c.scene.color = color;
            c.scene.count = count;
            c.scene.shape = shape;
        });
        self.send_command(SceneCommand::Randomize(seed));
        log::info!("Randomize : preset {preset}, vitesse {speed:.2}, count {count}");
    }

    fn send_command(&self, cmd: SceneCommand) {
        if let Some(ref tx) = self.command_tx
            && tx.try_send(cmd).is_err()
        {
            log::debug!("Commande {cmd:?} ignorée : thread de scène occupé ou arrêté");
        }
    }

    /// Check if the terminal has been resized and update buffers accordingly.
    fn check_resize(&mut self) -> Result<()> {
        let size = crossterm::terminal::size()?;
        if size != self.terminal_size {
            self.terminal_size = size;
            self.resize_to(ui::canvas_area(Rect::new(0, 0, size.0, size.1)));
        }
        Ok(())
    }

    /// Reallocate the grid for a canvas area and tell the scene about it.
    pub fn resize_to(&mut self, canvas: Rect) {
        let (cols, rows) = (u32::from(canvas.width), u32::from(canvas.height));
        // Réallouer (rare, OK d'allouer ici)
        self.grid = AsciiGrid::new(cols, rows);
        self.resized_frame = FrameBuffer::new(cols, rows);
        let (w, h) = pixel_size_for_cells(cols, rows);
        self.send_command(SceneCommand::Resize(w, h));
        log::debug!("Canvas redimensionné : {cols}×{rows}");
    }
}
