pub mod frame_json;
pub mod layout;
pub mod span;
pub mod style;
pub mod theme;
