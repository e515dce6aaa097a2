use crate::runtime::event::WidgetAction;
use crate::terminal::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, PlacedLines, RenderFrame, Terminal,
    TerminalEvent, TerminalSize,
};
use crate::ui::layout::display_width;
use crate::ui::span::Span;
use crate::ui::theme::{Appearance, Theme};
use crate::widgets::components::date_picker::DatePicker;
use crate::widgets::traits::{Drawable, InteractionResult, Interactive, RenderContext};
use std::io;
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(120);
const LABEL_ROW: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Enter was pressed; carries the entry text.
    Submitted(String),
    Cancelled,
}

/// Drives a single [`DatePicker`] on the alternate screen.
pub struct Runtime {
    picker: DatePicker,
    label: String,
    appearance: Appearance,
    outcome: Option<RunOutcome>,
}

impl Runtime {
    pub fn new(picker: DatePicker, appearance: Appearance) -> Self {
        let mut runtime = Self {
            picker,
            label: String::new(),
            appearance,
            outcome: None,
        };
        runtime.set_label("Date:");
        runtime
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(label);
        self
    }

    fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        let col = (display_width(&self.label) + 2) as u16;
        self.picker.set_origin(CursorPos {
            col,
            row: LABEL_ROW,
        });
    }

    pub fn picker(&self) -> &DatePicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut DatePicker {
        &mut self.picker
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn run(&mut self, terminal: &mut Terminal) -> io::Result<RunOutcome> {
        terminal.enter()?;

        let run_result = (|| -> io::Result<RunOutcome> {
            terminal.render_frame(&self.frame(terminal.size()))?;

            loop {
                if let Some(outcome) = self.outcome.clone() {
                    return Ok(outcome);
                }

                let now = Instant::now();
                let mut render = self.tick(now);

                let timeout = self.picker.poll_timeout(now, IDLE_POLL);
                if let Some(event) = terminal.poll_event(timeout)? {
                    render |= self.handle_event(event);
                }

                if render {
                    terminal.render_frame(&self.frame(terminal.size()))?;
                }
            }
        })();

        let exit_result = terminal.exit();
        match (run_result, exit_result) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Err(err), _) | (Ok(_), Err(err)) => Err(err),
        }
    }

    /// Returns true when the frame needs redrawing.
    pub fn handle_event(&mut self, event: TerminalEvent) -> bool {
        match event {
            TerminalEvent::Resize(_) => true,
            TerminalEvent::Key(key) if is_interrupt(key) => {
                tracing::debug!("interrupted");
                self.outcome = Some(RunOutcome::Cancelled);
                false
            }
            TerminalEvent::Key(key) => {
                if key.code == KeyCode::Esc && !self.picker.is_open() {
                    self.outcome = Some(RunOutcome::Cancelled);
                    return false;
                }
                let result = self.picker.on_key(key);
                self.apply(result)
            }
            TerminalEvent::Mouse(event) => {
                let result = self.picker.on_mouse(event);
                self.apply(result)
            }
        }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let result = self.picker.on_tick(now);
        self.apply(result)
    }

    fn apply(&mut self, result: InteractionResult) -> bool {
        for action in &result.actions {
            match action {
                WidgetAction::DateSelected { text } => {
                    tracing::info!(picker = self.picker.id(), text = %text, "date picked");
                }
                WidgetAction::InputDone => {
                    self.outcome = Some(RunOutcome::Submitted(self.picker.get_date().to_string()));
                }
            }
        }
        result.request_render
    }

    pub fn frame(&self, size: TerminalSize) -> RenderFrame {
        let ctx = RenderContext::new(size, self.appearance).with_focus(self.picker.id());
        let theme = Theme::for_appearance(self.appearance);
        let origin = self.picker.origin();

        let mut layers = vec![
            PlacedLines {
                origin: CursorPos {
                    col: 1,
                    row: LABEL_ROW,
                },
                lines: vec![vec![Span::styled(self.label.clone(), theme.title)]],
            },
            PlacedLines {
                origin,
                lines: self.picker.draw(&ctx).lines,
            },
        ];
        if let Some(placement) = self.picker.overlay_placement() {
            layers.push(PlacedLines {
                origin: CursorPos {
                    col: placement.col,
                    row: placement.row,
                },
                lines: self.picker.draw_overlay(&ctx).lines,
            });
        }

        let cursor = self.picker.cursor_pos().map(|local| CursorPos {
            col: origin.col.saturating_add(local.col),
            row: origin.row.saturating_add(local.row),
        });

        RenderFrame { layers, cursor }
    }
}

fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
