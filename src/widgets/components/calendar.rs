//! Calendar body drawn inside the date picker popup.
//!
//! Layout, in rows relative to the view:
//!
//! ```text
//!  <     March, 2024     >     header (navigation optional)
//! Mon Tue Wed Thu Fri Sat Sun  weekday names
//!               1   2   3      six rows of day cells
//! ```
//!
//! Every column is [`CELL_WIDTH`] terminal cells wide.

use crate::locale;
use crate::terminal::CursorPos;
use crate::ui::layout::{pad_center, pad_left, truncate_with_ellipsis};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::widgets::shared::calendar::{
    GRID_COLS, GRID_ROWS, GridCell, MonthGrid, YearMonth, month_grid, weekday_order,
};
use chrono::{Locale, Weekday};

pub const CELL_WIDTH: u16 = 4;
pub const VIEW_WIDTH: u16 = CELL_WIDTH * GRID_COLS as u16;
pub const VIEW_HEIGHT: u16 = 2 + GRID_ROWS as u16;

const HEADER_ROW: u16 = 0;
const GRID_TOP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarOptions {
    pub first_weekday: Weekday,
    pub show_navigation: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            first_weekday: Weekday::Mon,
            show_navigation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarHit {
    PrevMonth,
    NextMonth,
    Day(u32),
}

#[derive(Debug, Clone)]
pub struct CalendarView {
    cursor: YearMonth,
    show_navigation: bool,
    header: String,
    weekday_labels: [String; GRID_COLS],
    grid: MonthGrid,
    hovered: Option<u32>,
}

impl CalendarView {
    pub fn build(cursor: YearMonth, options: CalendarOptions, locale: Locale) -> Self {
        let header = format!(
            "{}, {:04}",
            locale::month_name(cursor.month(), locale),
            cursor.year()
        );
        let weekday_labels =
            weekday_order(options.first_weekday).map(|day| locale::weekday_abbrev(day, locale));

        Self {
            cursor,
            show_navigation: options.show_navigation,
            header,
            weekday_labels,
            grid: month_grid(cursor, options.first_weekday),
            hovered: None,
        }
    }

    pub fn cursor(&self) -> YearMonth {
        self.cursor
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn weekday_labels(&self) -> &[String] {
        &self.weekday_labels
    }

    pub fn has_navigation(&self) -> bool {
        self.show_navigation
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    /// Returns true when the highlighted day changed.
    pub fn set_hovered(&mut self, day: Option<u32>) -> bool {
        let changed = self.hovered != day;
        self.hovered = day;
        changed
    }

    /// `local` is relative to the view's top-left corner.
    pub fn hit_test(&self, local: CursorPos) -> Option<CalendarHit> {
        if local.col >= VIEW_WIDTH {
            return None;
        }
        let column = (local.col / CELL_WIDTH) as usize;

        if local.row == HEADER_ROW {
            if !self.show_navigation {
                return None;
            }
            return match column {
                0 => Some(CalendarHit::PrevMonth),
                c if c == GRID_COLS - 1 => Some(CalendarHit::NextMonth),
                _ => None,
            };
        }

        let row = local.row.checked_sub(GRID_TOP)? as usize;
        self.grid.cell(row, column)?.day().map(CalendarHit::Day)
    }

    pub fn draw(&self, theme: &Theme) -> Vec<SpanLine> {
        let mut lines: Vec<SpanLine> = Vec::with_capacity(VIEW_HEIGHT as usize);
        let inner_width = (VIEW_WIDTH - 2 * CELL_WIDTH) as usize;

        let mut header: SpanLine = Vec::new();
        if self.show_navigation {
            header.push(Span::styled(" < ", theme.nav));
            header.push(Span::new(" "));
        } else {
            header.push(Span::new(" ".repeat(CELL_WIDTH as usize)));
        }
        header.push(Span::styled(
            pad_center(&truncate_with_ellipsis(&self.header, inner_width), inner_width),
            theme.header,
        ));
        if self.show_navigation {
            header.push(Span::new(" "));
            header.push(Span::styled(" > ", theme.nav));
        } else {
            header.push(Span::new(" ".repeat(CELL_WIDTH as usize)));
        }
        lines.push(header);

        let weekdays: String = self
            .weekday_labels
            .iter()
            .map(|label| format!("{} ", pad_left(label, CELL_WIDTH as usize - 1)))
            .collect();
        lines.push(vec![Span::styled(weekdays, theme.weekday)]);

        for row in &self.grid.cells {
            let mut line: SpanLine = Vec::with_capacity(GRID_COLS * 2);
            for cell in row {
                match cell {
                    GridCell::Blank => line.push(Span::new(" ".repeat(CELL_WIDTH as usize))),
                    GridCell::Day(day) => {
                        let style = if self.hovered == Some(*day) {
                            theme.day.hover
                        } else {
                            theme.day.normal
                        };
                        line.push(Span::styled(format!("{day:>3}"), style));
                        line.push(Span::new(" "));
                    }
                }
            }
            lines.push(line);
        }

        lines
    }
}
