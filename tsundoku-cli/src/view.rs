use tsundoku_ux::{Dialog, Injector, View};

/// Renders the webhook dialogs as terminal headings. Alerts are held until
/// the command finishes so they become its error.
pub struct TerminalView<'a> {
    injector: &'a Injector,
    delete_label: Option<String>,
    alert: Option<String>,
}

impl<'a> TerminalView<'a> {
    pub fn new(injector: &'a Injector) -> Self {
        Self {
            injector,
            delete_label: None,
            alert: None,
        }
    }

    pub fn delete_label(&self) -> Option<&str> {
        self.delete_label.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

impl<'a> View for TerminalView<'a> {
    fn show_dialog(&mut self, dialog: Dialog) {
        let title = match dialog {
            Dialog::Add => "add-webhook-title",
            Dialog::Edit => "edit-webhook-title",
            Dialog::Delete => "delete-webhook-title",
        };
        println!("== {} ==", self.injector.get(title));
    }

    fn hide_dialogs(&mut self) {
        self.delete_label = None;
    }

    fn lock_scroll(&mut self) {
        log::trace!("scroll locked");
    }

    fn unlock_scroll(&mut self) {
        log::trace!("scroll unlocked");
    }

    fn set_delete_label(&mut self, name: &str) {
        self.delete_label = Some(name.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }
}
