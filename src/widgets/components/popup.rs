use crate::terminal::CursorPos;
use crate::ui::layout::pad_center;
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::widgets::components::calendar::{CalendarHit, CalendarView, VIEW_HEIGHT, VIEW_WIDTH};
use crate::widgets::shared::calendar::YearMonth;
use crate::widgets::traits::OverlayPlacement;

pub const POPUP_TITLE: &str = "Select Date";

/// Fixed-size popup window holding the calendar cursor and its view.
#[derive(Debug, Clone)]
pub struct Popup {
    generation: u64,
    placement: OverlayPlacement,
    cursor: YearMonth,
    calendar: Option<CalendarView>,
    focused: bool,
}

impl Popup {
    /// `anchor` is the absolute top-left cell of the popup.
    pub fn new(generation: u64, anchor: CursorPos, cursor: YearMonth) -> Self {
        Self {
            generation,
            placement: OverlayPlacement::new(anchor.row, anchor.col, VIEW_WIDTH, VIEW_HEIGHT + 1),
            cursor,
            calendar: None,
            focused: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn placement(&self) -> OverlayPlacement {
        self.placement
    }

    pub fn cursor(&self) -> YearMonth {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: YearMonth) {
        self.cursor = cursor;
    }

    pub fn calendar(&self) -> Option<&CalendarView> {
        self.calendar.as_ref()
    }

    /// Replaces the previous view wholesale.
    pub fn set_calendar(&mut self, view: CalendarView) {
        self.calendar = Some(view);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn contains(&self, pos: CursorPos) -> bool {
        self.placement.contains(pos)
    }

    pub fn hit_test(&self, pos: CursorPos) -> Option<CalendarHit> {
        let local = self.placement.local(pos)?;
        let row = local.row.checked_sub(1)?;
        self.calendar.as_ref()?.hit_test(CursorPos {
            col: local.col,
            row,
        })
    }

    pub fn set_hovered(&mut self, day: Option<u32>) -> bool {
        match &mut self.calendar {
            Some(view) => view.set_hovered(day),
            None => false,
        }
    }

    pub fn draw(&self, theme: &Theme) -> Vec<SpanLine> {
        let title_style = if self.focused {
            theme.title.bold()
        } else {
            theme.title
        };
        let mut lines = vec![vec![Span::styled(
            pad_center(POPUP_TITLE, self.placement.width as usize),
            title_style,
        )]];
        match &self.calendar {
            Some(view) => lines.extend(view.draw(theme)),
            None => lines.extend(
                (0..VIEW_HEIGHT).map(|_| vec![Span::new(" ".repeat(VIEW_WIDTH as usize))]),
            ),
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::components::calendar::CalendarOptions;
    use chrono::Locale;

    fn popup() -> Popup {
        let cursor = YearMonth::new(2024, 2).expect("month");
        let mut popup = Popup::new(1, CursorPos { col: 10, row: 5 }, cursor);
        popup.set_calendar(CalendarView::build(
            cursor,
            CalendarOptions::default(),
            Locale::POSIX,
        ));
        popup
    }

    #[test]
    fn placement_is_fixed_to_the_calendar_size() {
        let popup = popup();
        assert_eq!(
            popup.placement(),
            OverlayPlacement::new(5, 10, VIEW_WIDTH, VIEW_HEIGHT + 1)
        );
        assert_eq!(popup.draw(&Theme::for_appearance(Default::default())).len(), 9);
    }

    #[test]
    fn hit_test_skips_title_row() {
        let popup = popup();
        assert_eq!(popup.hit_test(CursorPos { col: 11, row: 5 }), None);
        assert_eq!(
            popup.hit_test(CursorPos { col: 11, row: 6 }),
            Some(CalendarHit::PrevMonth)
        );
        // Row 8 is the first week; column 3 holds the 1st.
        assert_eq!(
            popup.hit_test(CursorPos { col: 10 + 13, row: 8 }),
            Some(CalendarHit::Day(1))
        );
        assert_eq!(popup.hit_test(CursorPos { col: 9, row: 8 }), None);
    }
}
