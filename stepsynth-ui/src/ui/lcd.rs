//! Draws the 84×48 bitmap into a terminal buffer, two pixel rows per cell.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use stepsynth_core::bitmap::{Bitmap, HEIGHT, WIDTH};

/// Terminal cells needed to show the whole panel.
pub const COLS: u16 = WIDTH as u16;
pub const ROWS: u16 = (HEIGHT as u16).div_ceil(2);

pub fn cell_char(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '█',
        (true, false) => '▀',
        (false, true) => '▄',
        (false, false) => ' ',
    }
}

/// The bitmap as text, one string per terminal row.
pub fn lines(bitmap: &Bitmap) -> Vec<String> {
    (0..HEIGHT)
        .step_by(2)
        .map(|y| {
            (0..WIDTH)
                .map(|x| {
                    let bottom = y + 1 < HEIGHT && bitmap.pixel(x, y + 1);
                    cell_char(bitmap.pixel(x, y), bottom)
                })
                .collect()
        })
        .collect()
}

/// Backlight tint: brightness lifts the green background, contrast darkens
/// the pixels.
fn colors(bitmap: &Bitmap) -> (Color, Color) {
    let light = 60.0 + bitmap.brightness() * 160.0;
    let bg = Color::Rgb((light * 0.6) as u8, light as u8, (light * 0.4) as u8);
    let ink = ((1.0 - bitmap.contrast()) * 60.0) as u8;
    (Color::Rgb(ink, ink, ink), bg)
}

pub struct LcdWidget<'a> {
    bitmap: &'a Bitmap,
}

impl<'a> LcdWidget<'a> {
    pub fn new(bitmap: &'a Bitmap) -> Self {
        Self { bitmap }
    }
}

impl Widget for LcdWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (fg, bg) = colors(self.bitmap);
        let style = Style::default().fg(fg).bg(bg);
        for (row, line) in lines(self.bitmap).iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.bottom() {
                break;
            }
            for (col, ch) in line.chars().enumerate() {
                let x = area.x + col as u16;
                if x >= area.right() {
                    break;
                }
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepsynth_core::{Fill, Surface};

    #[test]
    fn test_cell_chars() {
        assert_eq!(cell_char(true, true), '█');
        assert_eq!(cell_char(true, false), '▀');
        assert_eq!(cell_char(false, true), '▄');
        assert_eq!(cell_char(false, false), ' ');
    }

    #[test]
    fn test_lines_pair_rows() {
        let mut b = Bitmap::new();
        b.fill_rect(0, 0, 1, 1, Fill::Black);
        b.fill_rect(1, 1, 1, 1, Fill::Black);
        b.fill_rect(2, 0, 1, 2, Fill::Black);
        b.refresh();

        let l = lines(&b);
        assert_eq!(l.len(), ROWS as usize);
        assert_eq!(l[0].chars().count(), COLS as usize);
        let head: String = l[0].chars().take(4).collect();
        assert_eq!(head, "▀▄█ ");
        assert!(l[1].chars().all(|c| c == ' '));
    }

    #[test]
    fn test_widget_draws_into_buffer() {
        let mut b = Bitmap::new();
        b.fill_rect(0, 0, WIDTH as i32, HEIGHT as i32, Fill::Black);
        b.refresh();

        let area = Rect::new(0, 0, COLS, ROWS);
        let mut buf = Buffer::empty(area);
        LcdWidget::new(&b).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "█");
        assert_eq!(buf[(COLS - 1, ROWS - 1)].symbol(), "█");
    }
}
