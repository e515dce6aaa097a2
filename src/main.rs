use chrono::{NaiveDate, Weekday};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use steply_datepicker::clock::{Clock, FixedClock, SystemClock};
use steply_datepicker::config::PickerConfig;
use steply_datepicker::error::{PickerError, Result};
use steply_datepicker::locale::ProcessLocale;
use steply_datepicker::runtime::{RunOutcome, Runtime};
use steply_datepicker::terminal::{Terminal, TerminalSize};
use steply_datepicker::ui::frame_json::frame_to_json;
use steply_datepicker::ui::theme::AppearanceSetting;
use steply_datepicker::widgets::components::date_picker::DatePicker;
use tracing_subscriber::EnvFilter;

const DUMP_SIZE: TerminalSize = TerminalSize {
    width: 80,
    height: 24,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AppearanceArg {
    Light,
    Dark,
    System,
}

impl From<AppearanceArg> for AppearanceSetting {
    fn from(value: AppearanceArg) -> Self {
        match value {
            AppearanceArg::Light => Self::Light,
            AppearanceArg::Dark => Self::Dark,
            AppearanceArg::System => Self::System,
        }
    }
}

/// Pick a date from a popup calendar in the terminal.
#[derive(Debug, Parser)]
#[command(name = "steply-datepicker", version)]
struct Args {
    /// YAML or JSON picker settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// strftime pattern for the picked date.
    #[arg(long = "format")]
    date_format: Option<String>,

    /// Locale for month and weekday names, e.g. de_DE.
    #[arg(long)]
    locale: Option<String>,

    /// Make the entry read-only; dates can only be picked.
    #[arg(long)]
    no_manual_input: bool,

    /// Hide the previous/next month controls.
    #[arg(long)]
    fixed_month: bool,

    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    add_months: Option<i32>,

    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    sub_months: Option<i32>,

    #[arg(long, value_name = "DAY")]
    first_weekday: Option<Weekday>,

    #[arg(long, value_enum)]
    appearance: Option<AppearanceArg>,

    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print the frame with the calendar open as JSON instead of running.
    #[arg(long)]
    dump_frame: bool,

    /// Write tracing output here; filtered by RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "picker failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    init_tracing(args.log_file.as_ref())?;

    let config = resolve_config(&args)?;
    let clock: Arc<dyn Clock> = match args.today {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    };
    let mut picker = DatePicker::with_env("date", clock, Arc::new(ProcessLocale));
    picker.apply_config(&config)?;

    let mut runtime = Runtime::new(picker, config.appearance.resolve());

    if args.dump_frame {
        runtime.picker_mut().open_calendar()?;
        let json = frame_to_json(&runtime.frame(DUMP_SIZE), DUMP_SIZE);
        let text = serde_json::to_string_pretty(&json)
            .map_err(|err| PickerError::Config(err.to_string()))?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    let mut terminal = Terminal::new()?;
    match runtime.run(&mut terminal)? {
        RunOutcome::Submitted(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Cancelled => Ok(ExitCode::from(130)),
    }
}

fn resolve_config(args: &Args) -> Result<PickerConfig> {
    let mut config = match &args.config {
        Some(path) => PickerConfig::load(path)?,
        None => PickerConfig::default(),
    };

    if let Some(format) = &args.date_format {
        config.date_format = format.clone();
    }
    if let Some(locale) = &args.locale {
        config.localization = Some(locale.clone());
    }
    if args.no_manual_input {
        config.allow_manual_input = false;
    }
    if args.fixed_month {
        config.allow_change_month = false;
    }
    if let Some(add) = args.add_months {
        config.months_offset_add = add;
    }
    if let Some(sub) = args.sub_months {
        config.months_offset_subtract = sub;
    }
    if let Some(weekday) = args.first_weekday {
        config.first_weekday = weekday;
    }
    if let Some(appearance) = args.appearance {
        config.appearance = appearance.into();
    }
    Ok(config)
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
