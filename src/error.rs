use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickerError {
    /// A configuration value that is only checked when the calendar is built.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported locale setting: {0:?}")]
    InvalidLocale(String),

    #[error("day {day} is out of range for {year:04}-{month:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("{0} requires an open calendar popup")]
    PopupNotOpen(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PickerError>;
