use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use sa_core::config::{RenderConfig, ThresholdPolicy};
use sa_core::frame::AsciiGrid;

use crate::canvas;
use crate::fps::FpsCounter;

/// Largeur fixe de la sidebar, bordure incluse.
pub const SIDEBAR_WIDTH: u16 = 22;

/// Application state mirrored for rendering decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Normal running state.
    Running,
    /// Source frames are no longer consumed; last frame stays on screen.
    Paused,
    /// Help overlay visible.
    Help,
    /// Quitting (should not reach draw).
    Quitting,
}

/// Everything `draw` needs for one frame.
pub struct DrawContext<'a> {
    /// Grille déjà rasterisée pour le canvas.
    pub grid: &'a AsciiGrid,
    /// Instantané de config affiché dans la sidebar.
    pub config: &'a RenderConfig,
    /// Mesures de cadence.
    pub fps: &'a FpsCounter,
    /// Pause, aide ou rendu normal.
    pub state: RenderState,
    /// Animation name or image file name.
    pub source_label: &'a str,
}

/// Zone du canvas pour une zone terminal donnée : tout sauf la sidebar.
///
/// # Example
/// ```
/// use ratatui::layout::Rect;
/// use sa_render::ui::{SIDEBAR_WIDTH, canvas_area};
/// let area = canvas_area(Rect::new(0, 0, 100, 30));
/// assert_eq!(area.width, 100 - SIDEBAR_WIDTH);
/// assert_eq!(area.height, 30);
/// ```
#[must_use]
pub fn canvas_area(area: Rect) -> Rect {
    split(area)[0]
}

fn split(area: Rect) -> [Rect; 2] {
    let chunks =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)]).split(area);
    [chunks[0], chunks[1]]
}

/// Draw the full UI: canvas + sidebar, and the help overlay on top if asked.
pub fn draw(frame: &mut Frame, ctx: &DrawContext<'_>) {
    let area = frame.area();
    let [canvas_rect, sidebar_rect] = split(area);

    canvas::render_grid(
        frame.buffer_mut(),
        canvas_rect,
        ctx.grid,
        ctx.config.color_enabled,
    );
    draw_sidebar(frame, sidebar_rect, ctx);

    if ctx.state == RenderState::Help {
        draw_help_overlay(frame, area);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

fn sidebar_lines(ctx: &DrawContext<'_>) -> Vec<Line<'static>> {
    let config = ctx.config;
    let scene = &config.scene;
    let header = Style::default().fg(Color::Yellow);

    let state_str = match ctx.state {
        RenderState::Running => "▶ RUN",
        RenderState::Paused => "⏸ PAUSE",
        RenderState::Help => "? HELP",
        RenderState::Quitting => "⏹ QUIT",
    };
    let policy = match config.threshold_policy {
        ThresholdPolicy::Cutoff => "cutoff",
        ThresholdPolicy::Offset => "offset",
    };

    vec![
        Line::from(Span::styled(state_str, Style::default().fg(Color::Green))),
        Line::from(format!(" {}", ctx.source_label)),
        Line::from(""),
        Line::from(Span::styled("─ Render ──", header)),
        Line::from(format!(" Chars: {}", config.charset_preset)),
        Line::from(format!(" Contr: {:.1}", config.contrast)),
        Line::from(format!(" Thresh: {:.2}", config.brightness_threshold)),
        Line::from(format!(" Policy: {policy}")),
        Line::from(format!(" Invert: {}", on_off(config.invert))),
        Line::from(format!(" Color: {}", on_off(config.color_enabled))),
        Line::from(""),
        Line::from(Span::styled("─ Scene ───", header)),
        Line::from(format!(" Anim: {}", scene.animation)),
        Line::from(format!(" Speed: {:.1}", scene.speed)),
        Line::from(format!(" Count: {}", scene.count)),
        Line::from(format!(" Shape: {}", scene.shape.name())),
        Line::from(""),
        Line::from(Span::styled("─ Info ────", header)),
        Line::from(format!(" {:.0} FPS", ctx.fps.fps())),
        Line::from(format!(" {:.1}ms", ctx.fps.frame_time_ms)),
        Line::from(format!(" {}×{}", ctx.grid.width, ctx.grid.height)),
        Line::from(""),
        Line::from(Span::styled(
            " ? = help",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn draw_sidebar(frame: &mut Frame, area: Rect, ctx: &DrawContext<'_>) {
    let sidebar = Paragraph::new(sidebar_lines(ctx))
        .block(Block::default().borders(Borders::LEFT).title(" Params "));
    frame.render_widget(sidebar, area);
}

const HELP_LINES: [&str; 15] = [
    " q/Esc    Quit",
    " Space    Play/Pause",
    " Tab      Next animation",
    " S-Tab    Prev animation",
    " 1-5      Charset preset",
    " [/]      Contrast ±",
    " -/+      Threshold ±",
    " t        Threshold policy",
    " i        Toggle invert",
    " c        Toggle color",
    " ,/.      Speed ±",
    " {/}      Count ±",
    " s        Next shape",
    " r        Randomize",
    " ?        Toggle help",
];

/// Draw a centered help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " scenascii : contrôles ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];
    help_text.extend(HELP_LINES.iter().map(|l| Line::from(*l)));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press ? or Esc to close ",
        Style::default().fg(Color::DarkGray),
    )));

    let help_width = 34u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use sa_core::frame::AsciiCell;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(state: RenderState) -> (Terminal<TestBackend>, AsciiGrid) {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut grid = AsciiGrid::new(58, 30);
        grid.set(0, 0, AsciiCell { ch: '@', fg: (255, 255, 255) });
        let config = RenderConfig::default();
        let fps = FpsCounter::new(10);
        let ctx = DrawContext {
            grid: &grid,
            config: &config,
            fps: &fps,
            state,
            source_label: "torus",
        };
        terminal.draw(|f| draw(f, &ctx)).unwrap();
        (terminal, grid)
    }

    #[test]
    fn canvas_and_sidebar_are_drawn() {
        let (terminal, _) = render(RenderState::Running);
        let text = screen_text(&terminal);
        assert!(text.starts_with('@'));
        assert!(text.contains("RUN"));
        assert!(text.contains("Anim: torus"));
        assert!(text.contains("Chars: standard"));
        assert!(!text.contains("Toggle help"));
    }

    #[test]
    fn help_overlay_lists_bindings() {
        let (terminal, _) = render(RenderState::Help);
        let text = screen_text(&terminal);
        assert!(text.contains("Randomize"));
        assert!(text.contains("Threshold policy"));
    }

    #[test]
    fn paused_state_is_shown() {
        let (terminal, _) = render(RenderState::Paused);
        assert!(screen_text(&terminal).contains("PAUSE"));
    }

    #[test]
    fn canvas_area_leaves_room_for_sidebar() {
        let area = canvas_area(Rect::new(0, 0, 80, 24));
        assert_eq!((area.width, area.height), (80 - SIDEBAR_WIDTH, 24));
    }
}
