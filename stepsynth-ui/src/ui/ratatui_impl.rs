use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph},
    Terminal,
};
use stepsynth_core::{Bitmap, DisplayState};

use super::keys::{map_key, PanelAction};
use super::lcd::{LcdWidget, COLS, ROWS};

/// Everything the status lines show besides the LCD itself.
pub struct StatusView {
    pub display: DisplayState,
    pub step_period: Duration,
    pub audio: String,
}

/// Ratatui-based terminal backend
pub struct RatatuiBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl RatatuiBackend {
    /// Create a new ratatui backend (does not start terminal mode)
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Enter raw mode and alternate screen
    pub fn start(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Leave raw mode and alternate screen
    pub fn stop(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn draw(&mut self, lcd: &Bitmap, status: &StatusView) -> io::Result<()> {
        self.terminal.draw(|f| {
            let [panel_area, status_area] =
                Layout::vertical([Constraint::Length(ROWS + 2), Constraint::Min(0)]).areas(f.area());
            let panel_area = centered(panel_area, COLS + 2);

            let block = Block::bordered().title(" stepsynth ");
            let inner = block.inner(panel_area);
            f.render_widget(block, panel_area);
            f.render_widget(LcdWidget::new(lcd), inner);

            let dim = Style::default().fg(Color::DarkGray);
            let d = &status.display;
            let lines = vec![
                Line::from(format!(
                    "sine {:>4.2}  square {:>4.2}  speed {:>4.2} ({}ms)  step {}  {}",
                    d.sine_volume,
                    d.square_volume,
                    d.playback_speed,
                    status.step_period.as_millis(),
                    d.playhead.index(),
                    status.audio,
                )),
                Line::from(format!("pattern {}", d.pattern)),
                Line::styled(
                    "arrows move  space/enter toggle  q/a sine  w/s square  e/d speed  esc quit",
                    dim,
                ),
            ];
            f.render_widget(Paragraph::new(lines), centered(status_area, COLS + 2));
        })?;
        Ok(())
    }

    /// Wait up to `timeout` for a key that means something on the panel.
    /// Other events are drained without waiting again.
    pub fn poll_action(&mut self, timeout: Duration) -> Option<PanelAction> {
        let mut t = timeout;
        loop {
            if !event::poll(t).ok()? {
                return None;
            }
            match event::read().ok()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(action) = map_key(key) {
                        return Some(action);
                    }
                }
                _ => {}
            }
            t = Duration::ZERO;
        }
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}
