use chrono::{Datelike, NaiveDate, Weekday};

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 7;

/// The (year, month) pair the calendar grid renders. `month` is always 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Steps forward `add` months, then back `sub` months, one month at a time.
    pub fn shifted(self, add: u32, sub: u32) -> Self {
        let mut cursor = self;
        for _ in 0..add {
            cursor = cursor.next();
        }
        for _ in 0..sub {
            cursor = cursor.prev();
        }
        cursor
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
        .unwrap_or(0)
}

/// Weekday of the 1st, as an offset from `first_weekday` (0..=6).
pub fn first_weekday_offset(cursor: YearMonth, first_weekday: Weekday) -> u32 {
    cursor
        .date(1)
        .map(|first| {
            (first.weekday().num_days_from_monday() + 7 - first_weekday.num_days_from_monday()) % 7
        })
        .unwrap_or(0)
}

/// Weekdays in display order, starting at `first_weekday`.
pub fn weekday_order(first_weekday: Weekday) -> [Weekday; 7] {
    let mut order = [first_weekday; 7];
    for i in 1..7 {
        order[i] = order[i - 1].succ();
    }
    order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Blank,
    Day(u32),
}

impl GridCell {
    pub fn day(self) -> Option<u32> {
        match self {
            Self::Blank => None,
            Self::Day(day) => Some(day),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub cursor: YearMonth,
    pub first_weekday: Weekday,
    pub cells: [[GridCell; GRID_COLS]; GRID_ROWS],
}

/// Lays out `cursor` as six weeks of seven cells; no rendering involved.
pub fn month_grid(cursor: YearMonth, first_weekday: Weekday) -> MonthGrid {
    let leading = first_weekday_offset(cursor, first_weekday) as usize;
    let days = cursor.days() as usize;
    let mut cells = [[GridCell::Blank; GRID_COLS]; GRID_ROWS];
    for day in 1..=days {
        let pos = leading + day - 1;
        cells[pos / GRID_COLS][pos % GRID_COLS] = GridCell::Day(day as u32);
    }
    MonthGrid {
        cursor,
        first_weekday,
        cells,
    }
}

impl MonthGrid {
    pub fn cell(&self, row: usize, col: usize) -> Option<GridCell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn day_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, GridCell::Day(_)))
            .count()
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .take_while(|cell| matches!(cell, GridCell::Blank))
            .count()
    }
}
