use crate::ui::style::{Color, Style};
use serde::{Deserialize, Serialize};

/// Light/dark mode of the host terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceSetting {
    Light,
    Dark,
    #[default]
    System,
}

impl AppearanceSetting {
    pub fn resolve(self) -> Appearance {
        match self {
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
            Self::System => std::env::var("COLORFGBG")
                .ok()
                .and_then(|value| appearance_from_colorfgbg(&value))
                .unwrap_or_default(),
        }
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); a white background
/// index means a light terminal.
pub fn appearance_from_colorfgbg(value: &str) -> Option<Appearance> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match bg {
        7 | 15 => Appearance::Light,
        _ => Appearance::Dark,
    })
}

pub const LIGHT_HOVER: Color = Color::rgb(0x3b, 0x8e, 0xd0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayButtonStyle {
    pub normal: Style,
    pub hover: Style,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub header: Style,
    pub nav: Style,
    pub weekday: Style,
    pub entry: Style,
    pub entry_readonly: Style,
    pub toggle: Style,
    pub day: DayButtonStyle,
}

impl Theme {
    pub fn for_appearance(appearance: Appearance) -> Self {
        let day = match appearance {
            Appearance::Light => DayButtonStyle {
                normal: Style::new().color(Color::Black),
                hover: Style::new().color(Color::Black).background(LIGHT_HOVER),
            },
            Appearance::Dark => DayButtonStyle {
                normal: Style::default(),
                hover: Style::new().color(Color::White).background(Color::Blue),
            },
        };
        Self {
            title: Style::new().color(Color::DarkGrey),
            header: Style::new().bold(),
            nav: Style::new().color(Color::White).background(Color::Blue),
            weekday: Style::new().color(Color::DarkGrey),
            entry: Style::new().underline(),
            entry_readonly: Style::new().underline().dim(),
            toggle: Style::new().color(Color::White).background(Color::Blue),
            day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_days_use_dark_text_and_fixed_hover() {
        let theme = Theme::for_appearance(Appearance::Light);
        assert_eq!(theme.day.normal.color, Some(Color::Black));
        assert_eq!(theme.day.normal.background, None);
        assert_eq!(theme.day.hover.background, Some(LIGHT_HOVER));
    }

    #[test]
    fn dark_days_use_default_style() {
        let theme = Theme::for_appearance(Appearance::Dark);
        assert!(theme.day.normal.is_plain());
    }

    #[test]
    fn colorfgbg_parsing() {
        assert_eq!(appearance_from_colorfgbg("0;15"), Some(Appearance::Light));
        assert_eq!(appearance_from_colorfgbg("15;default;0"), Some(Appearance::Dark));
        assert_eq!(appearance_from_colorfgbg("garbage"), None);
    }
}
