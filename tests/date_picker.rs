use chrono::{Locale, NaiveDate};
use std::sync::Arc;
use std::time::{Duration, Instant};
use steply_datepicker::clock::FixedClock;
use steply_datepicker::error::PickerError;
use steply_datepicker::locale::{IsolatedLocale, LocaleCategory, LocaleProvider};
use steply_datepicker::runtime::event::WidgetAction;
use steply_datepicker::terminal::{KeyCode, KeyEvent, MouseEvent};
use steply_datepicker::widgets::components::date_picker::{ChangeDirection, DatePicker};
use steply_datepicker::widgets::shared::calendar::YearMonth;
use steply_datepicker::widgets::traits::Interactive;

// With the origin at (0, 0): the toggle sits at column 13, the popup title on
// row 1, the month header on row 2 and the first grid row on row 4.
const TOGGLE_COL: u16 = 13;
const HEADER_ROW: u16 = 2;
const GRID_ROW: u16 = 4;

fn picker_on(year: i32, month: u32, day: u32) -> DatePicker {
    let today = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
    DatePicker::with_env(
        "date",
        Arc::new(FixedClock(today)),
        Arc::new(IsolatedLocale::new()),
    )
}

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).expect("valid month")
}

fn day_pos(row: u16, col: u16) -> MouseEvent {
    MouseEvent::click(col * 4 + 1, GRID_ROW + row)
}

#[test]
fn open_starts_at_today() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    assert!(picker.is_open());
    assert_eq!(picker.cursor(), Some(ym(2024, 6)));
    assert_eq!(picker.calendar().expect("view").header(), "June, 2024");
}

#[test]
fn add_offset_rolls_into_next_year() {
    let mut picker = picker_on(2024, 11, 20);
    picker.set_change_months("add", 2).expect("direction");
    picker.open_calendar().expect("open");
    assert_eq!(picker.cursor(), Some(ym(2025, 1)));
}

#[test]
fn sub_offset_rolls_into_previous_year() {
    let mut picker = picker_on(2024, 1, 5);
    picker.set_change_months("sub", 3).expect("direction");
    picker.open_calendar().expect("open");
    assert_eq!(picker.cursor(), Some(ym(2023, 10)));
}

#[test]
fn add_then_sub_are_both_applied() {
    let mut picker = picker_on(2024, 6, 1);
    picker.set_change_months_by(ChangeDirection::Add, 5);
    picker.set_change_months_by(ChangeDirection::Sub, 2);
    picker.open_calendar().expect("open");
    assert_eq!(picker.cursor(), Some(ym(2024, 9)));
}

#[test]
fn unknown_direction_is_rejected_without_changes() {
    let mut picker = picker_on(2024, 6, 1);
    let err = picker.set_change_months("mul", 1).expect_err("bad direction");
    assert!(matches!(err, PickerError::InvalidArgument(_)));
    assert_eq!(picker.months_offset_add(), 0);
    assert_eq!(picker.months_offset_subtract(), 0);
}

#[test]
fn negative_offset_fails_at_build_time() {
    let mut picker = picker_on(2024, 6, 1);
    picker.set_change_months("add", -1).expect("sign is not checked here");
    assert_eq!(picker.months_offset_add(), -1);

    let err = picker.open_calendar().expect_err("negative offset");
    assert!(matches!(err, PickerError::InvalidConfiguration(_)));
    assert!(!picker.is_open());
    assert!(picker.calendar_grid().is_none());
}

#[test]
fn negative_sub_offset_fails_at_build_time() {
    let mut picker = picker_on(2024, 6, 1);
    picker.set_change_months("sub", -2).expect("sign is not checked here");
    assert_eq!(picker.months_offset_subtract(), -2);

    let err = picker.open_calendar().expect_err("negative offset");
    match err {
        PickerError::InvalidConfiguration(message) => {
            assert!(message.contains("months_offset_subtract"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!picker.is_open());
}

#[test]
fn select_date_formats_into_entry_and_closes() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    picker.select_date(15).expect("select");

    assert_eq!(picker.get_date(), "06/15/2024");
    assert_eq!(picker.selected_date(), NaiveDate::from_ymd_opt(2024, 6, 15));
    assert!(!picker.is_open());
}

#[test]
fn select_date_uses_custom_format_and_locale() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
    let mut picker = DatePicker::with_env(
        "date",
        Arc::new(FixedClock(today)),
        Arc::new(IsolatedLocale::new()),
    );
    picker.set_localization("de_DE").expect("locale");
    picker.set_date_format("%-d. %B %Y");
    picker.open_calendar().expect("open");
    assert_eq!(picker.calendar().expect("view").header(), "März, 2024");

    picker.select_date(5).expect("select");
    assert_eq!(picker.get_date(), "5. März 2024");
}

#[test]
fn localization_keeps_numeric_category_at_c() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).expect("date");
    let provider = Arc::new(IsolatedLocale::new());
    let mut picker = DatePicker::with_env("date", Arc::new(FixedClock(today)), provider.clone());

    picker.set_localization("de_DE").expect("locale");
    assert_eq!(provider.locale(LocaleCategory::Time), Locale::de_DE);
    assert_eq!(provider.locale(LocaleCategory::Numeric), Locale::POSIX);
}

#[test]
fn unknown_locale_is_rejected() {
    let mut picker = picker_on(2024, 6, 1);
    let err = picker.set_localization("xx_YY").expect_err("unknown locale");
    assert!(matches!(err, PickerError::InvalidLocale(_)));
}

#[test]
fn select_date_rejects_missing_day() {
    let mut picker = picker_on(2023, 2, 10);
    picker.open_calendar().expect("open");
    let err = picker.select_date(29).expect_err("no Feb 29 in 2023");
    assert!(matches!(
        err,
        PickerError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29
        }
    ));
    assert!(picker.is_open());
    assert_eq!(picker.get_date(), "");
}

#[test]
fn read_only_entry_keeps_text_and_still_receives_picks() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    picker.select_date(15).expect("select");

    picker.set_allow_manual_input(false);
    assert_eq!(picker.get_date(), "06/15/2024");
    assert!(!picker.entry_editable());

    picker.on_key(KeyEvent::plain(KeyCode::Char('x')));
    assert_eq!(picker.get_date(), "06/15/2024");

    picker.open_calendar().expect("open");
    picker.select_date(20).expect("select");
    assert_eq!(picker.get_date(), "06/20/2024");
    assert!(!picker.entry_editable());

    picker.set_allow_manual_input(true);
    assert!(picker.entry_editable());
}

#[test]
fn typed_text_is_returned_verbatim() {
    let mut picker = picker_on(2024, 6, 3);
    for ch in "tomorrow".chars() {
        picker.on_key(KeyEvent::plain(KeyCode::Char(ch)));
    }
    assert_eq!(picker.get_date(), "tomorrow");
}

#[test]
fn navigation_rolls_over_year_boundaries() {
    let mut picker = picker_on(2024, 12, 31);
    picker.open_calendar().expect("open");
    picker.next_month().expect("next");
    assert_eq!(picker.cursor(), Some(ym(2025, 1)));
    picker.prev_month().expect("prev");
    picker.prev_month().expect("prev");
    assert_eq!(picker.cursor(), Some(ym(2024, 11)));
}

#[test]
fn navigation_does_not_reapply_offsets() {
    let mut picker = picker_on(2024, 6, 1);
    picker.set_change_months("add", 2).expect("direction");
    picker.open_calendar().expect("open");
    assert_eq!(picker.cursor(), Some(ym(2024, 8)));
    picker.next_month().expect("next");
    assert_eq!(picker.cursor(), Some(ym(2024, 9)));
}

#[test]
fn operations_without_popup_fail_fast() {
    let mut picker = picker_on(2024, 6, 1);
    assert!(matches!(
        picker.select_date(1),
        Err(PickerError::PopupNotOpen("select_date"))
    ));
    assert!(matches!(
        picker.next_month(),
        Err(PickerError::PopupNotOpen("next_month"))
    ));
    assert!(matches!(
        picker.prev_month(),
        Err(PickerError::PopupNotOpen("prev_month"))
    ));
    assert!(matches!(
        picker.build_calendar(),
        Err(PickerError::PopupNotOpen("build_calendar"))
    ));
}

#[test]
fn leap_february_grid() {
    let mut picker = picker_on(2024, 2, 10);
    picker.open_calendar().expect("open");
    let grid = picker.calendar_grid().expect("grid");
    assert_eq!(grid.day_cells(), 29);
    // 2024-02-01 is a Thursday.
    assert_eq!(grid.leading_blanks(), 3);
}

#[test]
fn focus_grab_fires_after_delay() {
    let mut picker = picker_on(2024, 6, 1);
    let t0 = Instant::now();
    picker.open_calendar_at(t0).expect("open");

    picker.on_tick(t0 + Duration::from_millis(499));
    assert!(!picker.popup_focused());
    picker.on_tick(t0 + Duration::from_millis(500));
    assert!(picker.popup_focused());
}

#[test]
fn reopening_cancels_the_previous_focus_grab() {
    let mut picker = picker_on(2024, 6, 1);
    let t0 = Instant::now();
    picker.open_calendar_at(t0).expect("open");
    picker
        .open_calendar_at(t0 + Duration::from_millis(100))
        .expect("reopen");
    assert_eq!(picker.popup().expect("popup").generation(), 2);

    picker.on_tick(t0 + Duration::from_millis(550));
    assert!(!picker.popup_focused());
    picker.on_tick(t0 + Duration::from_millis(600));
    assert!(picker.popup_focused());
}

#[test]
fn closing_cancels_pending_focus_grab() {
    let mut picker = picker_on(2024, 6, 1);
    let t0 = Instant::now();
    picker.open_calendar_at(t0).expect("open");
    picker.close_calendar();
    let result = picker.on_tick(t0 + Duration::from_secs(1));
    assert!(!result.handled);
    assert!(!picker.is_open());
    assert_eq!(
        picker.poll_timeout(t0, Duration::from_millis(120)),
        Duration::from_millis(120)
    );
}

#[test]
fn clicking_toggle_then_day_selects() {
    let mut picker = picker_on(2024, 6, 3);
    let result = picker.on_mouse(MouseEvent::click(TOGGLE_COL, 0));
    assert!(result.handled);
    assert!(picker.is_open());

    // 2024-06-01 is a Saturday, so the 15th is row 2, column 5.
    let result = picker.on_mouse(day_pos(2, 5));
    assert_eq!(
        result.actions,
        vec![WidgetAction::DateSelected {
            text: "06/15/2024".to_string()
        }]
    );
    assert_eq!(picker.get_date(), "06/15/2024");
    assert!(!picker.is_open());
}

#[test]
fn clicking_blank_cell_does_nothing() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    let result = picker.on_mouse(day_pos(0, 0));
    assert!(result.actions.is_empty());
    assert!(picker.is_open());
    assert_eq!(picker.get_date(), "");
}

#[test]
fn clicking_navigation_controls_changes_month() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    picker.on_mouse(MouseEvent::click(25, HEADER_ROW));
    assert_eq!(picker.cursor(), Some(ym(2024, 7)));
    picker.on_mouse(MouseEvent::click(1, HEADER_ROW));
    picker.on_mouse(MouseEvent::click(1, HEADER_ROW));
    assert_eq!(picker.cursor(), Some(ym(2024, 5)));
}

#[test]
fn navigation_controls_absent_when_month_changes_disabled() {
    let mut picker = picker_on(2024, 6, 3);
    picker.set_allow_change_month(false);
    picker.open_calendar().expect("open");
    assert!(!picker.calendar().expect("view").has_navigation());

    picker.on_mouse(MouseEvent::click(25, HEADER_ROW));
    picker.on_mouse(MouseEvent::click(1, HEADER_ROW));
    assert_eq!(picker.cursor(), Some(ym(2024, 6)));
}

#[test]
fn clicking_outside_closes_popup() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    let result = picker.on_mouse(MouseEvent::click(60, 20));
    assert!(result.handled);
    assert!(!picker.is_open());
}

#[test]
fn hovering_a_day_highlights_it() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    let result = picker.on_mouse(MouseEvent::moved(5 * 4 + 1, GRID_ROW + 2));
    assert!(result.handled);
    assert_eq!(picker.calendar().expect("view").hovered(), Some(15));

    let result = picker.on_mouse(MouseEvent::moved(5 * 4 + 2, GRID_ROW + 2));
    assert!(!result.handled);
}

#[test]
fn escape_closes_popup() {
    let mut picker = picker_on(2024, 6, 3);
    picker.open_calendar().expect("open");
    picker.on_key(KeyEvent::plain(KeyCode::Esc));
    assert!(!picker.is_open());
}

#[test]
fn keyboard_toggle_opens_calendar() {
    let mut picker = picker_on(2024, 6, 3);
    picker.on_key(KeyEvent::plain(KeyCode::Tab));
    picker.on_key(KeyEvent::plain(KeyCode::Enter));
    assert!(picker.is_open());
}

#[test]
fn localized_month_names_from_isolated_provider() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).expect("date");
    let mut picker = DatePicker::with_env(
        "date",
        Arc::new(FixedClock(today)),
        Arc::new(IsolatedLocale::with_locale(Locale::fr_FR)),
    );
    picker.open_calendar().expect("open");
    assert_eq!(picker.calendar().expect("view").header(), "Janvier, 2024");
}
