//! Terminal input: crossterm events mapped to viewer commands.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::io;
use std::time::{Duration, Instant};

/// Orbit angle per dragged cell, in radians
const DRAG_SENSITIVITY: f32 = 0.05;
/// Orbit angle per key press, in radians
const KEY_ORBIT_STEP: f32 = 0.15;
const ZOOM_STEP: f32 = 0.5;

/// Viewer action produced from user input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Quit,
    ToggleDebug,
    ResetAll,
    SelectNext,
    SelectPrevious,
    /// Move the selected slider by this many steps
    Adjust(i32),
    /// Flip the selected toggle or press the selected button
    Activate,
    Orbit { yaw: f32, pitch: f32 },
    Zoom(f32),
    Resize { columns: u16, rows: u16 },
}

/// Tracks an in-progress mouse drag between events
#[derive(Debug, Default)]
pub struct InputState {
    drag_origin: Option<(u16, u16)>,
}

impl InputState {
    /// Maps one terminal event to a command
    pub fn map_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            Event::Resize(columns, rows) => Some(Command::Resize {
                columns: *columns,
                rows: *rows,
            }),
            _ => None,
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent) -> Option<Command> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_origin = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (last_column, last_row) = self.drag_origin.replace((mouse.column, mouse.row))?;
                let dx = mouse.column as f32 - last_column as f32;
                let dy = mouse.row as f32 - last_row as f32;
                // Cells are about twice as tall as wide
                Some(Command::Orbit {
                    yaw: -dx * DRAG_SENSITIVITY,
                    pitch: dy * 2.0 * DRAG_SENSITIVITY,
                })
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_origin = None;
                None
            }
            MouseEventKind::ScrollUp => Some(Command::Zoom(-ZOOM_STEP)),
            MouseEventKind::ScrollDown => Some(Command::Zoom(ZOOM_STEP)),
            _ => None,
        }
    }

    /// Waits up to `timeout` for input and drains every queued event
    pub fn poll_commands(&mut self, timeout: Duration) -> io::Result<Vec<Command>> {
        let mut commands = Vec::new();
        let deadline = Instant::now() + timeout;
        let mut wait = timeout;
        while event::poll(wait)? {
            if let Some(command) = self.map_event(&event::read()?) {
                commands.push(command);
            }
            wait = deadline.saturating_duration_since(Instant::now());
        }
        Ok(commands)
    }
}

fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
        10
    } else {
        1
    };
    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Up => Some(Command::SelectPrevious),
        KeyCode::Down => Some(Command::SelectNext),
        KeyCode::Left => Some(Command::Adjust(-steps)),
        KeyCode::Right => Some(Command::Adjust(steps)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Activate),
        KeyCode::Char(c) => match c {
            'q' | 'Q' => Some(Command::Quit),
            'd' | 'D' => Some(Command::ToggleDebug),
            'r' | 'R' => Some(Command::ResetAll),
            'h' => Some(Command::Orbit {
                yaw: KEY_ORBIT_STEP,
                pitch: 0.0,
            }),
            'l' => Some(Command::Orbit {
                yaw: -KEY_ORBIT_STEP,
                pitch: 0.0,
            }),
            'k' => Some(Command::Orbit {
                yaw: 0.0,
                pitch: KEY_ORBIT_STEP,
            }),
            'j' => Some(Command::Orbit {
                yaw: 0.0,
                pitch: -KEY_ORBIT_STEP,
            }),
            '+' | '=' => Some(Command::Zoom(-ZOOM_STEP)),
            '-' | '_' => Some(Command::Zoom(ZOOM_STEP)),
            _ => None,
        },
        _ => None,
    }
}
