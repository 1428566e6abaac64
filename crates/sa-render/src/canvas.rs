use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use sa_core::frame::AsciiGrid;

/// Écrit directement une `AsciiGrid` dans un `ratatui::Buffer`.
///
/// Pas de widget Canvas ratatui : écriture directe, cellule par cellule.
/// La grille est tronquée à `area` ; avec `color == false` le premier plan
/// reste celui du terminal.
///
/// # Example
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use sa_core::frame::{AsciiCell, AsciiGrid};
/// use sa_render::canvas::render_grid;
///
/// let mut grid = AsciiGrid::new(2, 1);
/// grid.set(1, 0, AsciiCell { ch: '@', fg: (255, 0, 0) });
/// let area = Rect::new(0, 0, 2, 1);
/// let mut buf = Buffer::empty(area);
/// render_grid(&mut buf, area, &grid, true);
/// assert_eq!(buf[(1, 0)].symbol(), "@");
/// ```
pub fn render_grid(buf: &mut Buffer, area: Rect, grid: &AsciiGrid, color: bool) {
    let rows = grid.height.min(u32::from(area.height));
    let cols = grid.width.min(u32::from(area.width));
    for cy in 0..rows {
        for cx in 0..cols {
            let cell = grid.get(cx, cy);
            let pos = (area.x + cx as u16, area.y + cy as u16);
            if let Some(buf_cell) = buf.cell_mut(pos) {
                buf_cell.set_char(cell.ch);
                let fg = if color {
                    Color::Rgb(cell.fg.0, cell.fg.1, cell.fg.2)
                } else {
                    Color::Reset
                };
                buf_cell.set_fg(fg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::frame::AsciiCell;

    fn sample_grid() -> AsciiGrid {
        let mut grid = AsciiGrid::new(3, 2);
        for y in 0..2 {
            for x in 0..3 {
                grid.set(
                    x,
                    y,
                    AsciiCell {
                        ch: if (x + y) % 2 == 0 { '#' } else { '.' },
                        fg: (10, 20, 30),
                    },
                );
            }
        }
        grid
    }

    #[test]
    fn writes_characters_at_offset() {
        let grid = sample_grid();
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 4));
        render_grid(&mut buf, Rect::new(2, 1, 3, 2), &grid, true);
        assert_eq!(buf[(2, 1)].symbol(), "#");
        assert_eq!(buf[(3, 1)].symbol(), ".");
        assert_eq!(buf[(3, 2)].symbol(), "#");
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(2, 1)].fg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn monochrome_resets_foreground() {
        let grid = sample_grid();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        render_grid(&mut buf, area, &grid, false);
        assert_eq!(buf[(0, 0)].fg, Color::Reset);
    }

    #[test]
    fn grid_is_clipped_to_area() {
        let grid = sample_grid();
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        render_grid(&mut buf, Rect::new(0, 0, 2, 1), &grid, true);
        assert_eq!(buf[(1, 0)].symbol(), ".");
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }
}
