/// Deferred events delivered back to a widget by its scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Grab focus for the popup created with this generation.
    FocusPopup { generation: u64 },
}

/// Outward-facing effects a widget reports to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// A day was clicked and the entry now holds `text`.
    DateSelected { text: String },
    /// Enter was pressed in the entry.
    InputDone,
}
