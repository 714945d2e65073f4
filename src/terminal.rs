//! Presents frames in the terminal.
//!
//! Each character cell shows two vertically stacked pixels using the
//! upper-half-block glyph: foreground is the top pixel, background the
//! bottom one.

use crate::graphics::Framebuffer;
use crate::widget::PanelLine;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};

const FALLBACK_SIZE: (u16, u16) = (80, 24);
const UPPER_HALF_BLOCK: char = '▀';
const PANEL_BACKGROUND: Color = Color::Rgb { r: 24, g: 24, b: 32 };

pub const HELP_LINE: &str = concat!(
    " ↑↓ select  ←→ adjust (shift ×10)  space toggle",
    "  drag/hjkl orbit  +/- zoom  r reset  d debug  q quit",
);

/// Current terminal size in columns and rows
pub fn terminal_size() -> (u16, u16) {
    terminal::size()
        .ok()
        .or_else(|| termsize::get().map(|size| (size.cols, size.rows)))
        .unwrap_or(FALLBACK_SIZE)
}

/// Framebuffer size for a terminal: one pixel per column, two per row
pub fn framebuffer_size(columns: u16, rows: u16) -> (usize, usize) {
    (columns as usize, rows as usize * 2)
}

/// Raw-mode alternate-screen terminal, restored on drop
pub struct TerminalGuard {
    out: Stdout,
    columns: u16,
    rows: u16,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableLineWrap,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        let (columns, rows) = terminal_size();
        Ok(TerminalGuard { out, columns, rows })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    pub fn resize(&mut self, columns: u16, rows: u16) -> io::Result<()> {
        self.columns = columns;
        self.rows = rows;
        execute!(self.out, terminal::Clear(terminal::ClearType::All))
    }

    /// Draws the framebuffer, then the panel and HUD on top of it
    pub fn present(
        &mut self,
        framebuffer: &Framebuffer,
        panel: &[PanelLine],
        hud: &[String],
    ) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        self.draw_pixels(framebuffer)?;

        let mut row = 0;
        for line in panel {
            let (fg, bg) = match (line.header, line.selected) {
                (true, _) => (Color::Yellow, PANEL_BACKGROUND),
                (false, true) => (Color::Black, Color::White),
                (false, false) => (Color::White, PANEL_BACKGROUND),
            };
            self.draw_text(row, &line.text, fg, bg, line.header)?;
            row += 1;
        }
        row += 1;
        for line in hud {
            self.draw_text(row, line, Color::Green, Color::Black, false)?;
            row += 1;
        }
        if self.rows > 0 {
            self.draw_text(self.rows - 1, HELP_LINE, Color::DarkGrey, Color::Black, false)?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }

    fn draw_pixels(&mut self, framebuffer: &Framebuffer) -> io::Result<()> {
        let columns = (self.columns as usize).min(framebuffer.width());
        let rows = (self.rows as usize).min(framebuffer.height() / 2);
        let mut last: Option<([u8; 3], [u8; 3])> = None;

        for row in 0..rows {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for column in 0..columns {
                let top = framebuffer.pixel(column, row * 2);
                let bottom = framebuffer.pixel(column, row * 2 + 1);
                if last != Some((top, bottom)) {
                    queue!(
                        self.out,
                        SetForegroundColor(rgb(top)),
                        SetBackgroundColor(rgb(bottom))
                    )?;
                    last = Some((top, bottom));
                }
                queue!(self.out, Print(UPPER_HALF_BLOCK))?;
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        row: u16,
        text: &str,
        fg: Color,
        bg: Color,
        bold: bool,
    ) -> io::Result<()> {
        if row >= self.rows {
            return Ok(());
        }
        let visible: String = text.chars().take(self.columns as usize).collect();
        queue!(
            self.out,
            cursor::MoveTo(0, row),
            SetForegroundColor(fg),
            SetBackgroundColor(bg)
        )?;
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(self.out, Print(visible), SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}
