use super::text_edit;
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers};
use crate::ui::layout::{display_width, pad_right, truncate_to_width};
use crate::ui::span::Span;
use crate::ui::theme::Theme;
use crate::widgets::base::WidgetBase;
use crate::widgets::traits::{DrawOutput, Drawable, InteractionResult, Interactive, RenderContext};
use unicode_width::UnicodeWidthChar;

/// Single-line entry. When not editable it keeps its text but ignores keys.
pub struct TextInput {
    base: WidgetBase,
    value: String,
    cursor: usize,
    width: u16,
    editable: bool,
}

impl TextInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(id, label),
            value: String::new(),
            cursor: 0,
            width: 12,
            editable: true,
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width.max(1);
    }

    pub fn text(&self) -> &str {
        &self.value
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Inserts `text` at char index `at`. Ignored while read-only.
    pub fn insert(&mut self, at: usize, text: &str) {
        if !self.editable {
            return;
        }
        let mut pos = at;
        text_edit::insert_str(&mut self.value, &mut pos, text);
        self.cursor = text_edit::char_count(&self.value);
    }

    /// Visible slice of the value, scrolled so the cursor stays in view.
    fn visible_window(&self) -> (String, usize) {
        let width = self.width as usize;
        let cursor = text_edit::clamp_cursor(self.cursor, &self.value);
        let mut skip = 0usize;
        loop {
            let before: usize = self
                .value
                .chars()
                .skip(skip)
                .take(cursor - skip)
                .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
                .sum();
            if before < width || skip >= cursor {
                let visible: String = self.value.chars().skip(skip).collect();
                return (truncate_to_width(&visible, width), before);
            }
            skip += 1;
        }
    }
}

impl Drawable for TextInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let theme = Theme::for_appearance(ctx.appearance);
        let width = self.width as usize;

        let span = if self.value.is_empty() {
            Span::styled(" ".repeat(width), theme.entry)
        } else {
            let style = if self.editable {
                theme.entry
            } else {
                theme.entry_readonly
            };
            let (visible, _) = self.visible_window();
            Span::styled(pad_right(&visible, width), style)
        };

        DrawOutput {
            lines: vec![vec![span]],
        }
    }
}

impl Interactive for TextInput {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if key.code == KeyCode::Enter {
            return InteractionResult::input_done();
        }
        if !self.editable {
            return InteractionResult::ignored();
        }

        match key.code {
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if text_edit::delete_word_left(&mut self.value, &mut self.cursor) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                InteractionResult::ignored()
            }
            KeyCode::Char(ch) => {
                text_edit::insert_char(&mut self.value, &mut self.cursor, ch);
                InteractionResult::handled()
            }
            KeyCode::Backspace => {
                if text_edit::backspace_char(&mut self.value, &mut self.cursor) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Delete => {
                if text_edit::delete_char(&mut self.value, &mut self.cursor) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Left => {
                if text_edit::move_left(&mut self.cursor, &self.value) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Right => {
                if text_edit::move_right(&mut self.cursor, &self.value) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Home => {
                self.cursor = 0;
                InteractionResult::handled()
            }
            KeyCode::End => {
                self.cursor = text_edit::char_count(&self.value);
                InteractionResult::handled()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        if !self.editable {
            return None;
        }
        let (visible, before) = self.visible_window();
        let col = before.min(display_width(&visible)).min(self.width as usize);
        Some(CursorPos {
            col: col as u16,
            row: 0,
        })
    }

    fn value(&self) -> Option<String> {
        Some(self.value.clone())
    }
}
