use crate::runtime::event::WidgetAction;
use crate::terminal::{CursorPos, KeyEvent, MouseEvent, TerminalSize};
use crate::ui::span::SpanLine;
use crate::ui::theme::Appearance;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Overlay placement
// ---------------------------------------------------------------------------

/// Absolute, fixed-size rectangle an overlay is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    pub row: u16,
    pub col: u16,
    pub width: u16,
    pub height: u16,
}

impl OverlayPlacement {
    pub fn new(row: u16, col: u16, width: u16, height: u16) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    pub fn contains(&self, pos: CursorPos) -> bool {
        pos.row >= self.row
            && pos.row < self.row.saturating_add(self.height)
            && pos.col >= self.col
            && pos.col < self.col.saturating_add(self.width)
    }

    /// Position relative to the overlay's top-left corner.
    pub fn local(&self, pos: CursorPos) -> Option<CursorPos> {
        self.contains(pos).then(|| CursorPos {
            col: pos.col - self.col,
            row: pos.row - self.row,
        })
    }
}

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub focused_id: Option<String>,
    pub terminal_size: TerminalSize,
    pub appearance: Appearance,
}

impl RenderContext {
    pub fn new(terminal_size: TerminalSize, appearance: Appearance) -> Self {
        Self {
            focused_id: None,
            terminal_size,
            appearance,
        }
    }

    pub fn with_focus(mut self, id: impl Into<String>) -> Self {
        self.focused_id = Some(id.into());
        self
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused_id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

// ---------------------------------------------------------------------------
// Drawable: every node can draw itself
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> &str;
    fn label(&self) -> &str {
        ""
    }
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: vec![action],
        }
    }

    pub fn input_done() -> Self {
        Self::with_action(WidgetAction::InputDone)
    }

}

// ---------------------------------------------------------------------------
// Interactive: input nodes
// ---------------------------------------------------------------------------

pub trait Interactive: Send {
    // --- overlay (optional) ---

    fn overlay_placement(&self) -> Option<OverlayPlacement> {
        None
    }
    fn draw_overlay(&self, _ctx: &RenderContext) -> DrawOutput {
        DrawOutput::default()
    }

    // --- input handling ---

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;
    fn on_mouse(&mut self, _event: MouseEvent) -> InteractionResult {
        InteractionResult::ignored()
    }
    fn on_tick(&mut self, _now: Instant) -> InteractionResult {
        InteractionResult::ignored()
    }
    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }

    // --- value ---

    fn value(&self) -> Option<String> {
        None
    }
}
