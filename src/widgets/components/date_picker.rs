//! Date entry with a popup calendar.
//!
//! The picker draws an entry and a `▼` toggle on one row. Clicking the toggle
//! opens a popup below the entry whose calendar starts at today's month,
//! shifted by the configured month offsets. Clicking a day writes the date,
//! formatted with `date_format`, into the entry and closes the popup.
//!
//! Operations that need the calendar (`build_calendar`, `prev_month`,
//! `next_month`, `select_date`) fail with [`PickerError::PopupNotOpen`] when no
//! popup is open.

use crate::clock::{Clock, SystemClock};
use crate::config::PickerConfig;
use crate::error::{PickerError, Result};
use crate::locale::{self, LocaleCategory, LocaleProvider, ProcessLocale};
use crate::runtime::event::{PickerEvent, WidgetAction};
use crate::runtime::scheduler::{Scheduler, SchedulerCommand};
use crate::terminal::{CursorPos, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseKind};
use crate::ui::span::Span;
use crate::ui::theme::Theme;
use crate::widgets::base::WidgetBase;
use crate::widgets::components::calendar::{CalendarHit, CalendarOptions, CalendarView};
use crate::widgets::components::popup::Popup;
use crate::widgets::inputs::button::ButtonInput;
use crate::widgets::inputs::text::TextInput;
use crate::widgets::shared::calendar::{MonthGrid, YearMonth};
use crate::widgets::traits::{
    DrawOutput, Drawable, InteractionResult, Interactive, OverlayPlacement, RenderContext,
};
use chrono::{NaiveDate, Weekday};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";
pub const TOGGLE_TEXT: &str = "▼";
/// Delay before the popup grabs focus; works around window managers that
/// steal focus back right after a popup appears.
pub const FOCUS_DELAY: Duration = Duration::from_millis(500);

const ENTRY_HEIGHT: u16 = 1;
const DEFAULT_ENTRY_WIDTH: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Add,
    Sub,
}

impl FromStr for ChangeDirection {
    type Err = PickerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "add" => Ok(Self::Add),
            "sub" => Ok(Self::Sub),
            other => Err(PickerError::InvalidArgument(format!(
                "month change direction must be \"add\" or \"sub\", got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Entry,
    Toggle,
}

pub struct DatePicker {
    base: WidgetBase,
    entry: TextInput,
    toggle: ButtonInput,
    origin: CursorPos,
    focus: Part,

    date_format: String,
    allow_manual_input: bool,
    allow_change_month: bool,
    months_offset_add: i32,
    months_offset_subtract: i32,
    first_weekday: Weekday,

    selected_date: Option<NaiveDate>,
    popup: Option<Popup>,
    generation: u64,
    scheduler: Scheduler,

    clock: Arc<dyn Clock>,
    locale: Arc<dyn LocaleProvider>,
}

impl DatePicker {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_env(id, Arc::new(SystemClock), Arc::new(ProcessLocale))
    }

    pub fn with_env(
        id: impl Into<String>,
        clock: Arc<dyn Clock>,
        locale: Arc<dyn LocaleProvider>,
    ) -> Self {
        let base = WidgetBase::new(id, "Date");
        let entry =
            TextInput::new(base.child_id("entry"), "Date").with_width(DEFAULT_ENTRY_WIDTH);
        let toggle =
            ButtonInput::new(base.child_id("toggle"), "Open calendar").with_text(TOGGLE_TEXT);
        Self {
            base,
            entry,
            toggle,
            origin: CursorPos::default(),
            focus: Part::Entry,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            allow_manual_input: true,
            allow_change_month: true,
            months_offset_add: 0,
            months_offset_subtract: 0,
            first_weekday: Weekday::Mon,
            selected_date: None,
            popup: None,
            generation: 0,
            scheduler: Scheduler::new(),
            clock,
            locale,
        }
    }

    pub fn from_config(id: impl Into<String>, config: &PickerConfig) -> Result<Self> {
        let mut picker = Self::new(id);
        picker.apply_config(config)?;
        Ok(picker)
    }

    pub fn apply_config(&mut self, config: &PickerConfig) -> Result<()> {
        if let Some(name) = &config.localization {
            self.set_localization(name)?;
        }
        self.set_date_format(config.date_format.clone());
        self.set_allow_manual_input(config.allow_manual_input);
        self.set_allow_change_month(config.allow_change_month);
        self.set_change_months_by(ChangeDirection::Add, config.months_offset_add);
        self.set_change_months_by(ChangeDirection::Sub, config.months_offset_subtract);
        self.first_weekday = config.first_weekday;
        self.entry.set_width(config.entry_width);
        Ok(())
    }

    pub fn with_entry_width(mut self, width: u16) -> Self {
        self.entry.set_width(width);
        self
    }

    pub fn with_first_weekday(mut self, weekday: Weekday) -> Self {
        self.first_weekday = weekday;
        self
    }

    pub fn with_origin(mut self, origin: CursorPos) -> Self {
        self.origin = origin;
        self
    }

    /// Absolute terminal cell of the entry's first column.
    pub fn origin(&self) -> CursorPos {
        self.origin
    }

    pub fn set_origin(&mut self, origin: CursorPos) {
        self.origin = origin;
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    pub fn set_date_format(&mut self, pattern: impl Into<String>) {
        self.date_format = pattern.into();
    }

    /// Sets every locale category to `name`, then puts the numeric category
    /// back to `C`. With the default provider this is process-wide.
    pub fn set_localization(&mut self, name: &str) -> Result<()> {
        self.locale.set_locale(LocaleCategory::All, name)?;
        self.locale.set_locale(LocaleCategory::Numeric, "C")?;
        tracing::debug!(picker = self.base.id(), locale = name, "localization changed");
        Ok(())
    }

    pub fn set_allow_manual_input(&mut self, allow: bool) {
        self.allow_manual_input = allow;
        self.entry.set_editable(allow);
    }

    /// Takes effect the next time the calendar is built.
    pub fn set_allow_change_month(&mut self, allow: bool) {
        self.allow_change_month = allow;
    }

    /// `direction` is `"add"` or `"sub"`. The sign of `value` is checked when
    /// the calendar is built, not here.
    pub fn set_change_months(&mut self, direction: &str, value: i32) -> Result<()> {
        let direction = direction.parse::<ChangeDirection>()?;
        self.set_change_months_by(direction, value);
        Ok(())
    }

    pub fn set_change_months_by(&mut self, direction: ChangeDirection, value: i32) {
        match direction {
            ChangeDirection::Add => self.months_offset_add = value,
            ChangeDirection::Sub => self.months_offset_subtract = value,
        }
    }

    // ── Popup lifecycle ───────────────────────────────────────────────────────

    pub fn open_calendar(&mut self) -> Result<()> {
        self.open_calendar_at(Instant::now())
    }

    /// Like [`open_calendar`](Self::open_calendar), scheduling the focus-grab
    /// relative to `now`.
    pub fn open_calendar_at(&mut self, now: Instant) -> Result<()> {
        self.destroy_popup(now);

        self.generation += 1;
        let anchor = CursorPos {
            col: self.origin.col,
            row: self.origin.row.saturating_add(ENTRY_HEIGHT),
        };
        let cursor = YearMonth::from_date(self.clock.today());
        self.popup = Some(Popup::new(self.generation, anchor, cursor));
        let key = self.focus_key();
        self.scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key,
                delay: FOCUS_DELAY,
                event: PickerEvent::FocusPopup {
                    generation: self.generation,
                },
            },
            now,
        );

        if let Err(err) = self.build_calendar() {
            self.destroy_popup(now);
            tracing::warn!(picker = self.base.id(), error = %err, "calendar build failed");
            return Err(err);
        }

        tracing::debug!(
            picker = self.base.id(),
            generation = self.generation,
            "calendar opened"
        );
        Ok(())
    }

    /// Applies the month offsets to the cursor and rebuilds the calendar view.
    pub fn build_calendar(&mut self) -> Result<()> {
        let add = u32::try_from(self.months_offset_add).map_err(|_| {
            PickerError::InvalidConfiguration(format!(
                "months_offset_add cannot be negative (got {})",
                self.months_offset_add
            ))
        })?;
        let sub = u32::try_from(self.months_offset_subtract).map_err(|_| {
            PickerError::InvalidConfiguration(format!(
                "months_offset_subtract cannot be negative (got {})",
                self.months_offset_subtract
            ))
        })?;

        let popup = self
            .popup
            .as_mut()
            .ok_or(PickerError::PopupNotOpen("build_calendar"))?;
        popup.set_cursor(popup.cursor().shifted(add, sub));
        self.render_calendar()
    }

    pub fn prev_month(&mut self) -> Result<()> {
        let popup = self
            .popup
            .as_mut()
            .ok_or(PickerError::PopupNotOpen("prev_month"))?;
        popup.set_cursor(popup.cursor().prev());
        self.render_calendar()
    }

    pub fn next_month(&mut self) -> Result<()> {
        let popup = self
            .popup
            .as_mut()
            .ok_or(PickerError::PopupNotOpen("next_month"))?;
        popup.set_cursor(popup.cursor().next());
        self.render_calendar()
    }

    /// Writes `day` of the displayed month into the entry and closes the popup.
    pub fn select_date(&mut self, day: u32) -> Result<()> {
        let cursor = self
            .popup
            .as_ref()
            .ok_or(PickerError::PopupNotOpen("select_date"))?
            .cursor();
        let date = cursor.date(day).ok_or(PickerError::InvalidDate {
            year: cursor.year(),
            month: cursor.month(),
            day,
        })?;
        let text = locale::format_date(
            date,
            &self.date_format,
            self.locale.locale(LocaleCategory::Time),
        )?;

        self.selected_date = Some(date);
        self.entry.set_editable(true);
        self.entry.clear();
        self.entry.insert(0, &text);
        if !self.allow_manual_input {
            self.entry.set_editable(false);
        }
        self.destroy_popup(Instant::now());

        tracing::debug!(picker = self.base.id(), %date, text = %text, "date selected");
        Ok(())
    }

    pub fn close_calendar(&mut self) {
        self.destroy_popup(Instant::now());
    }

    /// Raw entry text: a picked date, typed text, or empty.
    pub fn get_date(&self) -> &str {
        self.entry.text()
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn allow_manual_input(&self) -> bool {
        self.allow_manual_input
    }

    pub fn allow_change_month(&self) -> bool {
        self.allow_change_month
    }

    pub fn months_offset_add(&self) -> i32 {
        self.months_offset_add
    }

    pub fn months_offset_subtract(&self) -> i32 {
        self.months_offset_subtract
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_some()
    }

    pub fn cursor(&self) -> Option<YearMonth> {
        self.popup.as_ref().map(Popup::cursor)
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn popup_focused(&self) -> bool {
        self.popup.as_ref().is_some_and(Popup::is_focused)
    }

    pub fn calendar(&self) -> Option<&CalendarView> {
        self.popup.as_ref().and_then(Popup::calendar)
    }

    pub fn calendar_grid(&self) -> Option<&MonthGrid> {
        self.calendar().map(CalendarView::grid)
    }

    pub fn entry_editable(&self) -> bool {
        self.entry.is_editable()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(now, default_timeout)
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn render_calendar(&mut self) -> Result<()> {
        let options = CalendarOptions {
            first_weekday: self.first_weekday,
            show_navigation: self.allow_change_month,
        };
        let locale = self.locale.locale(LocaleCategory::Time);
        let popup = self
            .popup
            .as_mut()
            .ok_or(PickerError::PopupNotOpen("build_calendar"))?;
        popup.set_calendar(CalendarView::build(popup.cursor(), options, locale));
        tracing::debug!(
            picker = self.base.id(),
            year = popup.cursor().year(),
            month = popup.cursor().month(),
            "calendar rebuilt"
        );
        Ok(())
    }

    fn destroy_popup(&mut self, now: Instant) {
        let Some(popup) = self.popup.take() else {
            return;
        };
        let key = self.focus_key();
        self.scheduler.schedule(SchedulerCommand::Cancel { key }, now);
        tracing::debug!(
            picker = self.base.id(),
            generation = popup.generation(),
            "calendar closed"
        );
    }

    fn focus_key(&self) -> String {
        self.base.child_id("popup-focus")
    }

    fn handle_event(&mut self, event: PickerEvent) -> bool {
        match event {
            PickerEvent::FocusPopup { generation } => match &mut self.popup {
                Some(popup) if popup.generation() == generation => {
                    popup.focus();
                    true
                }
                _ => false,
            },
        }
    }

    fn toggle_col(&self) -> u16 {
        self.origin
            .col
            .saturating_add(self.entry.width())
            .saturating_add(1)
    }

    fn entry_contains(&self, pos: CursorPos) -> bool {
        pos.row == self.origin.row
            && pos.col >= self.origin.col
            && pos.col < self.origin.col.saturating_add(self.entry.width())
    }

    fn toggle_contains(&self, pos: CursorPos) -> bool {
        let start = self.toggle_col();
        pos.row == self.origin.row
            && pos.col >= start
            && pos.col < start.saturating_add(self.toggle.width())
    }

    fn activate_toggle(&mut self) -> InteractionResult {
        if let Err(err) = self.open_calendar() {
            tracing::warn!(picker = self.base.id(), error = %err, "could not open calendar");
        }
        InteractionResult::handled()
    }

    fn apply_hit(&mut self, hit: CalendarHit) -> InteractionResult {
        let outcome = match hit {
            CalendarHit::PrevMonth => self.prev_month(),
            CalendarHit::NextMonth => self.next_month(),
            CalendarHit::Day(day) => self.select_date(day),
        };
        match (outcome, hit) {
            (Ok(()), CalendarHit::Day(_)) => InteractionResult::with_action(
                WidgetAction::DateSelected {
                    text: self.get_date().to_string(),
                },
            ),
            (Ok(()), _) => InteractionResult::handled(),
            (Err(err), _) => {
                tracing::warn!(
                    picker = self.base.id(),
                    error = %err,
                    ?hit,
                    "calendar click failed"
                );
                InteractionResult::handled()
            }
        }
    }
}

impl Drawable for DatePicker {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let mut part_ctx = ctx.clone();
        if self.base.is_focused(ctx) {
            part_ctx.focused_id = Some(match self.focus {
                Part::Entry => self.entry.id().to_string(),
                Part::Toggle => self.toggle.id().to_string(),
            });
        }

        let mut line = self
            .entry
            .draw(&part_ctx)
            .lines
            .into_iter()
            .next()
            .unwrap_or_default();
        line.push(Span::new(" "));
        line.extend(self.toggle.draw(&part_ctx).lines.into_iter().flatten());

        DrawOutput { lines: vec![line] }
    }
}

impl Interactive for DatePicker {
    fn overlay_placement(&self) -> Option<OverlayPlacement> {
        self.popup.as_ref().map(Popup::placement)
    }

    fn draw_overlay(&self, ctx: &RenderContext) -> DrawOutput {
        let theme = Theme::for_appearance(ctx.appearance);
        DrawOutput {
            lines: self
                .popup
                .as_ref()
                .map(|popup| popup.draw(&theme))
                .unwrap_or_default(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Esc if self.popup.is_some() => {
                self.close_calendar();
                InteractionResult::handled()
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Part::Entry => Part::Toggle,
                    Part::Toggle => Part::Entry,
                };
                InteractionResult::handled()
            }
            _ => match self.focus {
                Part::Toggle => {
                    if self.toggle.on_key(key).handled {
                        self.activate_toggle()
                    } else {
                        InteractionResult::ignored()
                    }
                }
                Part::Entry => self.entry.on_key(key),
            },
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) -> InteractionResult {
        let pos = event.pos();
        match event.kind {
            MouseKind::Moved => {
                let Some(popup) = self.popup.as_mut() else {
                    return InteractionResult::ignored();
                };
                let day = match popup.hit_test(pos) {
                    Some(CalendarHit::Day(day)) => Some(day),
                    _ => None,
                };
                if popup.set_hovered(day) {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
            MouseKind::Down(MouseButton::Left) => {
                if let Some(popup) = &self.popup
                    && popup.contains(pos)
                {
                    return match popup.hit_test(pos) {
                        Some(hit) => self.apply_hit(hit),
                        None => InteractionResult::handled(),
                    };
                }
                if self.toggle_contains(pos) {
                    self.focus = Part::Toggle;
                    return self.activate_toggle();
                }
                if self.entry_contains(pos) {
                    self.focus = Part::Entry;
                    self.close_calendar();
                    return InteractionResult::handled();
                }
                if self.popup.is_some() {
                    self.close_calendar();
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_tick(&mut self, now: Instant) -> InteractionResult {
        let mut changed = false;
        for event in self.scheduler.drain_ready(now) {
            changed |= self.handle_event(event);
        }
        if changed {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        if self.popup.is_some() || self.focus != Part::Entry {
            return None;
        }
        self.entry.cursor_pos()
    }

    fn value(&self) -> Option<String> {
        Some(self.get_date().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::locale::IsolatedLocale;
    use crate::terminal::TerminalSize;
    use crate::ui::span::line_text;
    use crate::ui::theme::Appearance;

    fn picker() -> DatePicker {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).expect("date");
        DatePicker::with_env(
            "date",
            Arc::new(FixedClock(today)),
            Arc::new(IsolatedLocale::new()),
        )
    }

    fn ctx() -> RenderContext {
        RenderContext::new(
            TerminalSize {
                width: 80,
                height: 24,
            },
            Appearance::Dark,
        )
    }

    #[test]
    fn change_direction_parses_add_and_sub_only() {
        assert_eq!("add".parse::<ChangeDirection>().ok(), Some(ChangeDirection::Add));
        assert_eq!("sub".parse::<ChangeDirection>().ok(), Some(ChangeDirection::Sub));
        assert!(matches!(
            "Add".parse::<ChangeDirection>(),
            Err(PickerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn draws_entry_and_toggle_on_one_row() {
        let picker = picker().with_entry_width(10);
        let out = picker.draw(&ctx());
        assert_eq!(out.lines.len(), 1);
        assert_eq!(line_text(&out.lines[0]), format!("{} {TOGGLE_TEXT}", " ".repeat(10)));
    }

    #[test]
    fn popup_anchors_below_entry() {
        let mut picker = picker().with_origin(CursorPos { col: 4, row: 2 });
        assert!(picker.overlay_placement().is_none());
        picker.open_calendar().expect("open");
        let placement = picker.overlay_placement().expect("placement");
        assert_eq!((placement.col, placement.row), (4, 3));
        assert_eq!(picker.draw_overlay(&ctx()).lines.len(), placement.height as usize);
    }

    #[test]
    fn each_open_bumps_generation() {
        let mut picker = picker();
        picker.open_calendar().expect("open");
        picker.open_calendar().expect("reopen");
        assert_eq!(picker.popup().map(Popup::generation), Some(2));
    }

    #[test]
    fn config_is_applied() {
        let mut picker = picker();
        let config = PickerConfig {
            date_format: "%Y-%m-%d".to_string(),
            allow_manual_input: false,
            allow_change_month: false,
            months_offset_add: 1,
            first_weekday: Weekday::Sun,
            ..PickerConfig::default()
        };
        picker.apply_config(&config).expect("config");
        assert_eq!(picker.date_format(), "%Y-%m-%d");
        assert!(!picker.entry_editable());
        assert!(!picker.allow_change_month());
        assert_eq!(picker.first_weekday(), Weekday::Sun);

        picker.open_calendar().expect("open");
        assert_eq!(picker.cursor(), YearMonth::new(2024, 7));
        picker.select_date(4).expect("select");
        assert_eq!(picker.get_date(), "2024-07-04");
    }
}
