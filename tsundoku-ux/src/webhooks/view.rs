#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialog {
    Add,
    Edit,
    Delete,
}

/// Presentation capabilities the webhook dialogs need.
pub trait View {
    fn show_dialog(&mut self, dialog: Dialog);

    /// Hides every open dialog.
    fn hide_dialogs(&mut self);

    fn lock_scroll(&mut self);

    fn unlock_scroll(&mut self);

    /// Name shown in the delete confirmation.
    fn set_delete_label(&mut self, name: &str);

    /// Blocking error notice.
    fn alert(&mut self, message: &str);
}
