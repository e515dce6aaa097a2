pub mod clock;
pub mod config;
pub mod error;
pub mod locale;
pub mod runtime;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PickerConfig;
pub use error::{PickerError, Result};
pub use locale::{IsolatedLocale, LocaleCategory, LocaleProvider, ProcessLocale};
pub use widgets::components::date_picker::{ChangeDirection, DatePicker};
pub use widgets::shared::calendar::{GridCell, MonthGrid, YearMonth, month_grid};
