use std::collections::VecDeque;
use std::time::Instant;

/// Compteur FPS par fenêtre glissante.
///
/// # Example
/// ```
/// use sa_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(60);
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    /// Instants des dernières frames, au plus `window`.
    timestamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
    /// Durée de la dernière frame en ms.
    pub frame_time_ms: f64,
    /// Frames comptées depuis la création.
    pub total_frames: u64,
}

impl FpsCounter {
    /// Create a counter averaging over `window` frames (at least 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time_ms: 0.0,
            total_frames: 0,
        }
    }

    /// À appeler une fois par frame, après le rendu.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Comme [`FpsCounter::tick`], avec un instant fourni par l'appelant.
    ///
    /// # Example
    /// ```
    /// use std::time::{Duration, Instant};
    /// use sa_render::fps::FpsCounter;
    /// let mut counter = FpsCounter::new(10);
    /// let t0 = Instant::now();
    /// counter.tick_at(t0);
    /// counter.tick_at(t0 + Duration::from_millis(50));
    /// assert!((counter.fps() - 20.0).abs() < 1e-6);
    /// assert!((counter.frame_time_ms - 50.0).abs() < 1e-6);
    /// ```
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(&last) = self.timestamps.back() {
            self.frame_time_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        }
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        self.total_frames += 1;

        if let Some(&first) = self.timestamps.front() {
            let secs = now.duration_since(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// La dernière frame a-t-elle dépassé 1.5× le budget de `target_fps` ?
    #[must_use]
    pub fn over_budget(&self, target_fps: u32) -> bool {
        let budget_ms = 1000.0 / f64::from(target_fps.max(1));
        self.frame_time_ms > budget_ms * 1.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn single_tick_reports_zero() {
        let mut counter = FpsCounter::new(10);
        counter.tick();
        assert!(counter.fps().abs() < f64::EPSILON);
        assert_eq!(counter.total_frames, 1);
    }

    #[test]
    fn steady_ticks_give_exact_rate() {
        let mut counter = FpsCounter::new(10);
        let start = Instant::now();
        for i in 0..5 {
            counter.tick_at(start + Duration::from_millis(i * 20));
        }
        assert!((counter.fps() - 50.0).abs() < 1e-6);
        assert!((counter.frame_time_ms - 20.0).abs() < 1e-6);
    }

    #[test]
    fn window_is_bounded() {
        let mut counter = FpsCounter::new(4);
        let start = Instant::now();
        for i in 0..20 {
            counter.tick_at(start + Duration::from_millis(i * 10));
        }
        assert_eq!(counter.timestamps.len(), 4);
        assert_eq!(counter.total_frames, 20);
    }

    #[test]
    fn budget_check() {
        let mut counter = FpsCounter::new(4);
        let start = Instant::now();
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_millis(40));
        assert!(counter.over_budget(60));
        assert!(!counter.over_budget(30));
    }
}
