use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::layout::display_width;
use crate::ui::span::Span;
use crate::ui::theme::Theme;
use crate::widgets::base::WidgetBase;
use crate::widgets::traits::{DrawOutput, Drawable, InteractionResult, Interactive, RenderContext};

pub struct ButtonInput {
    base: WidgetBase,
    text: String,
}

impl ButtonInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            base: WidgetBase::new(id, label.clone()),
            text: label,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> u16 {
        display_width(&self.text).max(1) as u16
    }
}

impl Drawable for ButtonInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let theme = Theme::for_appearance(ctx.appearance);
        let label = if self.text.is_empty() {
            " "
        } else {
            &self.text
        };
        let style = if self.base.is_focused(ctx) {
            theme.toggle.bold()
        } else {
            theme.toggle
        };

        DrawOutput {
            lines: vec![vec![Span::styled(label, style)]],
        }
    }
}

impl Interactive for ButtonInput {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => InteractionResult::handled(),
            _ => InteractionResult::ignored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_space_activate() {
        let mut button = ButtonInput::new("toggle", "Open").with_text("▼");
        assert!(button.on_key(KeyEvent::plain(KeyCode::Enter)).handled);
        assert!(button.on_key(KeyEvent::plain(KeyCode::Char(' '))).handled);
        assert!(!button.on_key(KeyEvent::plain(KeyCode::Char('x'))).handled);
        assert_eq!(button.width(), 1);
    }
}
