pub mod backend;
pub mod event;

pub use backend::{PlacedLines, RenderFrame, Terminal};
pub use event::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseKind, TerminalEvent,
    TerminalSize,
};
