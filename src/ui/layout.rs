use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cuts `text` so that it occupies at most `width` terminal columns.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Like [`truncate_to_width`], but marks a cut with a trailing `…`.
pub fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = truncate_to_width(text, width - 1);
    out.push('…');
    out
}

pub fn pad_right(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let fill = width.saturating_sub(display_width(&text));
    format!("{text}{}", " ".repeat(fill))
}

pub fn pad_left(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let fill = width.saturating_sub(display_width(&text));
    format!("{}{text}", " ".repeat(fill))
}

/// Centers `text` in `width` columns; odd padding goes to the right.
pub fn pad_center(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let fill = width.saturating_sub(display_width(&text));
    let left = fill / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
}
