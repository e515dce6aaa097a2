//! Locale capability used for month/weekday names and date formatting.
//!
//! `ProcessLocale` mirrors a C `setlocale` call: the setting is shared by every
//! picker in the process. `IsolatedLocale` keeps the same state per instance,
//! which is what tests and embedders that host several pickers want.

use crate::error::{PickerError, Result};
use chrono::format::{DelayedFormat, StrftimeItems};
use chrono::{Days, Locale, NaiveDate, Weekday};
use std::fmt::Write;
use std::sync::{OnceLock, PoisonError, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleCategory {
    /// Every category at once.
    All,
    /// Month and weekday names, date formatting.
    Time,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleState {
    time: Locale,
    numeric: Locale,
}

impl Default for LocaleState {
    fn default() -> Self {
        Self {
            time: Locale::POSIX,
            numeric: Locale::POSIX,
        }
    }
}

impl LocaleState {
    fn set(&mut self, category: LocaleCategory, locale: Locale) {
        match category {
            LocaleCategory::All => {
                self.time = locale;
                self.numeric = locale;
            }
            LocaleCategory::Time => self.time = locale,
            LocaleCategory::Numeric => self.numeric = locale,
        }
    }

    fn get(&self, category: LocaleCategory) -> Locale {
        match category {
            LocaleCategory::All | LocaleCategory::Time => self.time,
            LocaleCategory::Numeric => self.numeric,
        }
    }
}

pub trait LocaleProvider: Send + Sync {
    fn set_locale(&self, category: LocaleCategory, name: &str) -> Result<()>;
    fn locale(&self, category: LocaleCategory) -> Locale;
}

static PROCESS_LOCALE: OnceLock<RwLock<LocaleState>> = OnceLock::new();

fn process_state() -> &'static RwLock<LocaleState> {
    PROCESS_LOCALE.get_or_init(|| RwLock::new(LocaleState::default()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLocale;

impl LocaleProvider for ProcessLocale {
    fn set_locale(&self, category: LocaleCategory, name: &str) -> Result<()> {
        let locale = parse_locale(name)?;
        process_state()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(category, locale);
        tracing::debug!(?category, ?locale, "process locale changed");
        Ok(())
    }

    fn locale(&self, category: LocaleCategory) -> Locale {
        process_state()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(category)
    }
}

#[derive(Debug, Default)]
pub struct IsolatedLocale {
    state: RwLock<LocaleState>,
}

impl IsolatedLocale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: Locale) -> Self {
        Self {
            state: RwLock::new(LocaleState {
                time: locale,
                numeric: locale,
            }),
        }
    }
}

impl LocaleProvider for IsolatedLocale {
    fn set_locale(&self, category: LocaleCategory, name: &str) -> Result<()> {
        let locale = parse_locale(name)?;
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(category, locale);
        Ok(())
    }

    fn locale(&self, category: LocaleCategory) -> Locale {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(category)
    }
}

/// Resolves a `setlocale`-style name such as `de_DE`, `fr_FR.UTF-8` or `C`.
///
/// An empty name resolves from `LC_ALL`, `LC_TIME` and `LANG`, in that order.
pub fn parse_locale(name: &str) -> Result<Locale> {
    let name = name.trim();
    if name.is_empty() {
        let from_env = ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty());
        return match from_env {
            Some(value) => parse_locale(&value),
            None => Ok(Locale::POSIX),
        };
    }

    let base = name.split(['.', '@']).next().unwrap_or(name);
    match base {
        "C" | "POSIX" => Ok(Locale::POSIX),
        _ => Locale::try_from(base).map_err(|_| PickerError::InvalidLocale(name.to_string())),
    }
}

/// Formats `date` with a strftime pattern using `locale` for names.
pub fn format_date(date: NaiveDate, pattern: &str, locale: Locale) -> Result<String> {
    let items = StrftimeItems::new_with_locale(pattern, locale);
    let formatted = DelayedFormat::new_with_locale(Some(date), None, items, locale);
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| {
        PickerError::InvalidConfiguration(format!("unsupported date format {pattern:?}"))
    })?;
    Ok(out)
}

/// Full month name, capitalized. `month` is 1-based.
pub fn month_name(month: u32, locale: Locale) -> String {
    NaiveDate::from_ymd_opt(2001, month, 1)
        .and_then(|date| format_date(date, "%B", locale).ok())
        .map(|name| capitalize(&name))
        .unwrap_or_default()
}

/// First three letters of the weekday name, capitalized.
pub fn weekday_abbrev(weekday: Weekday, locale: Locale) -> String {
    // 2001-01-01 was a Monday.
    let offset = Days::new(u64::from(weekday.num_days_from_monday()));
    let date = NaiveDate::from_ymd_opt(2001, 1, 1).and_then(|monday| monday.checked_add_days(offset));
    let Some(date) = date else {
        return String::new();
    };
    let name = format_date(date, "%A", locale).unwrap_or_default();
    let abbrev: String = name.chars().take(3).collect();
    capitalize(&abbrev)
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
