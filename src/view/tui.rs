//! Terminal user interface for the oscillating waveform.
//!
//! Strokes every wave of a frame onto a braille canvas and shows the input
//! level, damped level and switches in a one-line footer.

use super::frame::{StrokedWave, WaveView};
use crate::wave::Rgb;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Paragraph,
    },
};
use std::io::{stdout, Stdout};
use std::time::Duration;

/// Braille dots per terminal cell, horizontally and vertically.
const DOTS_PER_CELL_X: f64 = 2.0;
const DOTS_PER_CELL_Y: f64 = 4.0;

/// User input command while the view is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Keep rendering (no key pressed)
    Continue,
    /// Leave the view (Escape, 'q' or Ctrl+C)
    Quit,
    /// Start/stop listening to the input (Space)
    ToggleListen,
    /// Start/stop oscillating while silent ('o')
    ToggleOscillation,
}

/// Footer status shown under the waves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FooterStatus {
    pub listening: bool,
    pub oscillating: bool,
    pub level: f64,
    pub damped_level: f64,
}

/// Terminal UI that owns the alternate screen while the waveform is shown.
pub struct WaveTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl WaveTui {
    /// Creates a new TUI instance and enters alternate screen mode.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        Ok(WaveTui { terminal })
    }

    /// Draws one frame of `view` plus the footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(&mut self, view: &WaveView, status: FooterStatus) -> anyhow::Result<()> {
        let view_config = view.view_config();
        let background = to_color(view_config.background);
        let clear_on_draw = view_config.clear_on_draw;

        self.terminal.draw(|frame| {
            let area = frame.area();
            let footer_height = 1;

            let content_area = Rect {
                height: area.height.saturating_sub(footer_height),
                ..area
            };
            let footer_area = Rect {
                y: area.y + content_area.height,
                height: area.height.min(footer_height),
                ..area
            };

            let width = f64::from(content_area.width) * DOTS_PER_CELL_X;
            let height = f64::from(content_area.height) * DOTS_PER_CELL_Y;
            let geometry = view.geometry(width, height);
            let waves = view.build_frame(&geometry);

            let mut canvas = Canvas::default()
                .marker(Marker::Braille)
                .x_bounds([0.0, width.max(1.0)])
                .y_bounds([0.0, height.max(1.0)])
                .paint(|ctx| paint_waves(ctx, &waves));
            if clear_on_draw {
                canvas = canvas.background_color(background);
            }
            frame.render_widget(canvas, content_area);

            frame.render_widget(footer(status, background), footer_area);
        })?;

        Ok(())
    }

    /// Processes pending user input.
    ///
    /// Waits at most `timeout` for a key press.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self, timeout: Duration) -> anyhow::Result<ViewCommand> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: leaving view");
                        ViewCommand::Quit
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: leaving view");
                        ViewCommand::Quit
                    }
                    KeyCode::Char(' ') => ViewCommand::ToggleListen,
                    KeyCode::Char('o') => ViewCommand::ToggleOscillation,
                    _ => ViewCommand::Continue,
                });
            }
        }
        Ok(ViewCommand::Continue)
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for WaveTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Strokes each wave on its own layer so later (nearer) waves cover earlier ones.
fn paint_waves(ctx: &mut Context<'_>, waves: &[StrokedWave]) {
    for wave in waves {
        // Lines of width 2 and more get a second stroke one dot row higher
        let strokes = wave.style.line_width.round().max(1.0) as usize;
        for segment in &wave.segments {
            let color = to_color(segment.color);
            for offset in 0..strokes.min(2) {
                let offset = offset as f64;
                ctx.draw(&CanvasLine::new(
                    segment.from.x,
                    segment.from.y + offset,
                    segment.to.x,
                    segment.to.y + offset,
                    color,
                ));
            }
        }
        ctx.layer();
    }
}

fn footer(status: FooterStatus, background: Color) -> Paragraph<'static> {
    let indicator = if status.listening {
        Span::styled("● ", Style::default().fg(Color::Red))
    } else {
        Span::styled("⏸ ", Style::default().fg(Color::Yellow))
    };
    let mode = if status.oscillating { "osc" } else { "frozen" };
    let level = (status.level * 100.0).round() as u8;
    let damped = (status.damped_level * 100.0).round() as u8;

    let line = ratatui::text::Line::from(vec![
        indicator,
        Span::raw(format!("{level}%")),
        Span::raw(" / "),
        Span::raw(format!("{damped}%")),
        Span::raw(" / "),
        Span::raw(mode),
        Span::styled(
            "   space listen · o oscillate · q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    Paragraph::new(line).style(Style::default().fg(Color::Rgb(185, 207, 212)).bg(background))
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
