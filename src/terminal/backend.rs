use crate::terminal::event::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseKind, TerminalEvent,
    TerminalSize,
};
use crate::ui::layout::{display_width, truncate_to_width};
use crate::ui::span::SpanLine;
use crate::ui::style::{Color, Style};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers as CrosstermKeyModifiers, MouseButton as CrosstermMouseButton, MouseEventKind,
};
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// A block of lines drawn with its top-left corner at `origin`.
#[derive(Debug, Clone, Default)]
pub struct PlacedLines {
    pub origin: CursorPos,
    pub lines: Vec<SpanLine>,
}

#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    /// Drawn in order; later layers paint over earlier ones.
    pub layers: Vec<PlacedLines>,
    pub cursor: Option<CursorPos>,
}

pub struct Terminal {
    stdout: Stdout,
    size: TerminalSize,
    entered: bool,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: TerminalSize { width, height },
            entered: false,
        })
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        self.entered = true;
        self.refresh_size()
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        execute!(self.stdout, Show, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn refresh_size(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        self.size = TerminalSize { width, height };
        Ok(())
    }

    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TerminalEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let mapped = match event::read()? {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                Some(TerminalEvent::Key(map_key_event(key)))
            }
            CrosstermEvent::Resize(width, height) => {
                self.size = TerminalSize { width, height };
                Some(TerminalEvent::Resize(self.size))
            }
            CrosstermEvent::Mouse(mouse) => map_mouse_kind(mouse.kind).map(|kind| {
                TerminalEvent::Mouse(MouseEvent {
                    kind,
                    col: mouse.column,
                    row: mouse.row,
                })
            }),
            _ => None,
        };
        Ok(mapped)
    }

    pub fn render_frame(&mut self, frame: &RenderFrame) -> io::Result<()> {
        queue!(self.stdout, BeginSynchronizedUpdate, Hide, Clear(ClearType::All))?;
        for layer in &frame.layers {
            for (offset, line) in layer.lines.iter().enumerate() {
                let row = layer.origin.row.saturating_add(offset as u16);
                if row >= self.size.height {
                    break;
                }
                queue!(self.stdout, MoveTo(layer.origin.col, row))?;
                let room = self.size.width.saturating_sub(layer.origin.col) as usize;
                self.queue_line(line, room)?;
            }
        }
        if let Some(cursor) = frame.cursor {
            queue!(self.stdout, MoveTo(cursor.col, cursor.row), Show)?;
        }
        queue!(self.stdout, EndSynchronizedUpdate)?;
        self.stdout.flush()
    }

    fn queue_line(&mut self, line: &SpanLine, mut room: usize) -> io::Result<()> {
        for span in line {
            if room == 0 {
                break;
            }
            let text = truncate_to_width(&span.text, room);
            room = room.saturating_sub(display_width(&text));
            self.queue_styled(&text, span.style)?;
        }
        Ok(())
    }

    fn queue_styled(&mut self, text: &str, style: Style) -> io::Result<()> {
        if style.is_plain() {
            return queue!(self.stdout, Print(text));
        }
        if let Some(fg) = style.color {
            queue!(self.stdout, SetForegroundColor(map_color(fg)))?;
        }
        if let Some(bg) = style.background {
            queue!(self.stdout, SetBackgroundColor(map_color(bg)))?;
        }
        if style.bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.stdout, SetAttribute(Attribute::Dim))?;
        }
        if style.underline {
            queue!(self.stdout, SetAttribute(Attribute::Underlined))?;
        }
        queue!(
            self.stdout,
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::Reset => CrosstermColor::Reset,
        Color::Black => CrosstermColor::Black,
        Color::DarkGrey => CrosstermColor::DarkGrey,
        Color::Red => CrosstermColor::Red,
        Color::Green => CrosstermColor::Green,
        Color::Yellow => CrosstermColor::Yellow,
        Color::Blue => CrosstermColor::Blue,
        Color::Magenta => CrosstermColor::Magenta,
        Color::Cyan => CrosstermColor::Cyan,
        Color::White => CrosstermColor::White,
        Color::Rgb { r, g, b } => CrosstermColor::Rgb { r, g, b },
    }
}

fn map_key_event(event: CrosstermKeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(event.code),
        modifiers: map_key_modifiers(event.modifiers),
    }
}

fn map_key_code(code: CrosstermKeyCode) -> KeyCode {
    match code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

fn map_key_modifiers(modifiers: CrosstermKeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        mapped |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        mapped |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(CrosstermKeyModifiers::ALT) {
        mapped |= KeyModifiers::ALT;
    }
    mapped
}

fn map_mouse_button(button: CrosstermMouseButton) -> MouseButton {
    match button {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn map_mouse_kind(kind: MouseEventKind) -> Option<MouseKind> {
    match kind {
        MouseEventKind::Down(button) => Some(MouseKind::Down(map_mouse_button(button))),
        MouseEventKind::Up(button) => Some(MouseKind::Up(map_mouse_button(button))),
        MouseEventKind::Drag(button) => Some(MouseKind::Drag(map_mouse_button(button))),
        MouseEventKind::Moved => Some(MouseKind::Moved),
        MouseEventKind::ScrollUp => Some(MouseKind::Scroll(-1)),
        MouseEventKind::ScrollDown => Some(MouseKind::Scroll(1)),
        _ => None,
    }
}
