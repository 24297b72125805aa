use reqwest::Method;
use tsundoku_types::WebhookBase;

use crate::client::WebhookClient;

mod form;
pub use form::*;

mod view;
pub use view::*;

pub const WEBHOOKS_PATH: &str = "/api/webhooks";

/// Inputs of both the add and the edit form.
pub const FORM_INPUTS: &[&str] = &["name", "service", "url", "content_fmt"];

/// Alert shown for any failed request.
pub const FAILURE_MESSAGE: &str = "There was an error processing the request.";

pub fn webhook_path(base_id: u64) -> String {
    format!("{WEBHOOKS_PATH}/{base_id}")
}

/// Emitted after the server accepted a change; the receiver decides how to
/// refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    Created,
    Updated(u64),
    Deleted(u64),
}

/// Add/edit/delete dialogs for webhook bases.
///
/// Every operation takes `&mut self`, so a controller never has more than one
/// request in flight.
pub struct WebhookModals<V: View, C: WebhookClient> {
    view: V,
    client: C,
    add_form: Form,
    edit_form: Form,
    editing: Option<u64>,
    pending_delete: Option<u64>,
    failure_message: String,
    on_change: Box<dyn FnMut(WebhookEvent)>,
}

impl<V: View, C: WebhookClient> WebhookModals<V, C> {
    pub fn new(view: V, client: C, on_change: impl FnMut(WebhookEvent) + 'static) -> Self {
        Self {
            view,
            client,
            add_form: Form::new(FORM_INPUTS.iter().copied()),
            edit_form: Form::new(FORM_INPUTS.iter().copied()),
            editing: None,
            pending_delete: None,
            failure_message: FAILURE_MESSAGE.to_string(),
            on_change: Box::new(on_change),
        }
    }

    /// Replaces the generic alert text, e.g. with a localized one.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn form(&self, dialog: Dialog) -> Option<&Form> {
        match dialog {
            Dialog::Add => Some(&self.add_form),
            Dialog::Edit => Some(&self.edit_form),
            Dialog::Delete => None,
        }
    }

    pub fn form_mut(&mut self, dialog: Dialog) -> Option<&mut Form> {
        match dialog {
            Dialog::Add => Some(&mut self.add_form),
            Dialog::Edit => Some(&mut self.edit_form),
            Dialog::Delete => None,
        }
    }

    /// Base id the delete confirmation is armed with.
    pub fn pending_delete(&self) -> Option<u64> {
        self.pending_delete
    }

    pub fn open_add(&mut self) {
        self.add_form.bind(Method::POST, WEBHOOKS_PATH);
        self.open(Dialog::Add);
    }

    pub fn open_edit(&mut self, webhook: &WebhookBase) {
        self.edit_form.reset();
        if let Err(e) = self.edit_form.fill_from(webhook) {
            warn!("failed to populate edit form for {}: {:?}", webhook.base_id, e);
        }
        self.edit_form
            .bind(Method::PUT, webhook_path(webhook.base_id));
        self.editing = Some(webhook.base_id);
        self.open(Dialog::Edit);
    }

    pub fn open_delete(&mut self, webhook: &WebhookBase) {
        self.pending_delete = Some(webhook.base_id);
        self.view.set_delete_label(&webhook.name);
        self.open(Dialog::Delete);
    }

    pub fn close_all(&mut self) {
        self.pending_delete = None;
        self.view.hide_dialogs();
        self.view.unlock_scroll();
    }

    fn open(&mut self, dialog: Dialog) {
        self.view.lock_scroll();
        self.view.show_dialog(dialog);
    }

    /// Shared submit handler of the add and edit forms.
    pub async fn submit(&mut self, dialog: Dialog) {
        let event = match dialog {
            Dialog::Add => WebhookEvent::Created,
            Dialog::Edit => match self.editing {
                Some(base_id) => WebhookEvent::Updated(base_id),
                None => {
                    warn!("edit form submitted before it was opened");
                    return;
                }
            },
            Dialog::Delete => {
                warn!("delete dialog has no form to submit");
                return;
            }
        };
        let form = if dialog == Dialog::Add {
            &self.add_form
        } else {
            &self.edit_form
        };
        let Some(action) = form.action() else {
            warn!("{:?} form submitted without a target", dialog);
            return;
        };
        let (method, action, body) = (form.method().clone(), action.to_string(), form.serialize());

        match self.client.send(method.clone(), &action, Some(body)).await {
            Ok(()) => {
                info!("{} {} accepted", method, action);
                (self.on_change)(event);
            }
            Err(e) => {
                error!("{} {} failed: {:?}", method, action, e);
                self.view.alert(&self.failure_message);
            }
        }
    }

    /// Click on the delete confirmation button.
    pub async fn confirm_delete(&mut self) {
        let Some(base_id) = self.pending_delete else {
            warn!("delete confirmed with no webhook selected");
            return;
        };
        let path = webhook_path(base_id);
        match self.client.send(Method::DELETE, &path, None).await {
            Ok(()) => {
                info!("DELETE {} accepted", path);
                self.pending_delete = None;
                (self.on_change)(WebhookEvent::Deleted(base_id));
            }
            Err(e) => {
                error!("DELETE {} failed: {:?}", path, e);
                self.view.alert(&self.failure_message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
        sync::{Arc, Mutex},
    };

    use anyhow::Result;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Shown {
        Dialog(Dialog),
        HideAll,
        Lock,
        Unlock,
        Label(String),
        Alert(String),
    }

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<Shown>,
    }

    impl View for RecordingView {
        fn show_dialog(&mut self, dialog: Dialog) {
            self.calls.push(Shown::Dialog(dialog));
        }

        fn hide_dialogs(&mut self) {
            self.calls.push(Shown::HideAll);
        }

        fn lock_scroll(&mut self) {
            self.calls.push(Shown::Lock);
        }

        fn unlock_scroll(&mut self) {
            self.calls.push(Shown::Unlock);
        }

        fn set_delete_label(&mut self, name: &str) {
            self.calls.push(Shown::Label(name.to_string()));
        }

        fn alert(&mut self, message: &str) {
            self.calls.push(Shown::Alert(message.to_string()));
        }
    }

    type Sent = Arc<Mutex<Vec<(Method, String, Option<String>)>>>;

    #[derive(Default)]
    struct FakeClient {
        sent: Sent,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl WebhookClient for FakeClient {
        async fn send(&self, method: Method, path: &str, form: Option<String>) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((method, path.to_string(), form));
            if self.fail {
                bail!("Got HTTP Status: 500 Internal Server Error");
            }
            Ok(())
        }
    }

    fn webhook(base_id: u64, name: &str) -> WebhookBase {
        WebhookBase {
            name: name.to_string(),
            base_id,
            service: "discord".to_string(),
            url: "https://discord.com/api/webhooks/1/abc".to_string(),
            content_fmt: "{name} {episode}".to_string(),
            valid: true,
        }
    }

    fn modals(
        fail: bool,
    ) -> (
        WebhookModals<RecordingView, FakeClient>,
        Sent,
        Rc<RefCell<Vec<WebhookEvent>>>,
    ) {
        let sent = Sent::default();
        let events = Rc::new(RefCell::new(vec![]));
        let sink = events.clone();
        let modals = WebhookModals::new(
            RecordingView::default(),
            FakeClient {
                sent: sent.clone(),
                fail,
            },
            move |event| sink.borrow_mut().push(event),
        );
        (modals, sent, events)
    }

    #[test]
    fn test_open_add_binds_create_endpoint() {
        let (mut modals, _, _) = modals(false);
        modals.open_add();
        let form = modals.form(Dialog::Add).unwrap();
        assert_eq!(form.action(), Some("/api/webhooks"));
        assert_eq!(form.method(), Method::POST);
        assert_eq!(
            modals.view().calls,
            vec![Shown::Lock, Shown::Dialog(Dialog::Add)]
        );
    }

    #[test]
    fn test_open_edit_binds_update_endpoint_and_populates() {
        let (mut modals, _, _) = modals(false);
        modals.form_mut(Dialog::Edit).unwrap().set("name", "leftover");
        modals.open_edit(&webhook(42, "announce"));
        let form = modals.form(Dialog::Edit).unwrap();
        assert_eq!(form.action(), Some("/api/webhooks/42"));
        assert_eq!(form.method(), Method::PUT);
        assert_eq!(form.get("name"), Some("announce"));
        assert_eq!(form.get("service"), Some("discord"));
        assert_eq!(form.get("content_fmt"), Some("{name} {episode}"));
        assert_eq!(
            modals.view().calls,
            vec![Shown::Lock, Shown::Dialog(Dialog::Edit)]
        );
    }

    #[test]
    fn test_open_delete_labels_and_arms() {
        let (mut modals, _, _) = modals(false);
        modals.open_delete(&webhook(9, "old hook"));
        assert_eq!(modals.pending_delete(), Some(9));
        assert_eq!(
            modals.view().calls,
            vec![
                Shown::Label("old hook".to_string()),
                Shown::Lock,
                Shown::Dialog(Dialog::Delete)
            ]
        );
    }

    #[test]
    fn test_close_all() {
        let (mut modals, _, _) = modals(false);
        modals.open_delete(&webhook(9, "old hook"));
        modals.close_all();
        assert_eq!(modals.pending_delete(), None);
        assert_eq!(
            &modals.view().calls[3..],
            &[Shown::HideAll, Shown::Unlock]
        );
    }

    #[tokio::test]
    async fn test_submit_add_sends_form_and_emits_created() {
        let (mut modals, sent, events) = modals(false);
        modals.open_add();
        modals.open_add();
        let form = modals.form_mut(Dialog::Add).unwrap();
        form.set("name", "new hook");
        form.set("service", "custom");
        modals.submit(Dialog::Add).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, Method::POST);
        assert_eq!(sent[0].1, "/api/webhooks");
        assert_eq!(
            sent[0].2.as_deref(),
            Some("name=new%20hook&service=custom&url=&content_fmt=")
        );
        assert_eq!(*events.borrow(), vec![WebhookEvent::Created]);
    }

    #[tokio::test]
    async fn test_submit_edit_targets_base_id() {
        let (mut modals, sent, events) = modals(false);
        modals.open_edit(&webhook(42, "announce"));
        modals.submit(Dialog::Edit).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].0, Method::PUT);
        assert_eq!(sent[0].1, "/api/webhooks/42");
        assert_eq!(*events.borrow(), vec![WebhookEvent::Updated(42)]);
    }

    #[tokio::test]
    async fn test_submit_failure_alerts_once() {
        let (mut modals, sent, events) = modals(true);
        modals.open_add();
        modals.submit(Dialog::Add).await;

        assert_eq!(sent.lock().unwrap().len(), 1);
        assert!(events.borrow().is_empty());
        let alerts: Vec<_> = modals
            .view()
            .calls
            .iter()
            .filter(|x| matches!(x, Shown::Alert(_)))
            .collect();
        assert_eq!(alerts, vec![&Shown::Alert(FAILURE_MESSAGE.to_string())]);
    }

    #[tokio::test]
    async fn test_submit_unbound_form_sends_nothing() {
        let (mut modals, sent, events) = modals(false);
        modals.submit(Dialog::Add).await;
        modals.submit(Dialog::Edit).await;
        modals.submit(Dialog::Delete).await;
        assert!(sent.lock().unwrap().is_empty());
        assert!(events.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_delete_targets_base_id() {
        let (mut modals, sent, events) = modals(false);
        modals.open_delete(&webhook(9, "old hook"));
        modals.confirm_delete().await;

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(Method::DELETE, "/api/webhooks/9".to_string(), None)]
        );
        assert_eq!(*events.borrow(), vec![WebhookEvent::Deleted(9)]);
        assert_eq!(modals.pending_delete(), None);
    }

    #[tokio::test]
    async fn test_confirm_delete_uses_latest_webhook() {
        let (mut modals, sent, _) = modals(false);
        modals.open_delete(&webhook(1, "first"));
        modals.open_delete(&webhook(2, "second"));
        modals.confirm_delete().await;
        modals.confirm_delete().await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "/api/webhooks/2");
    }

    #[tokio::test]
    async fn test_confirm_delete_failure_uses_custom_message() {
        let (modals, _, events) = modals(true);
        let mut modals = modals.with_failure_message("Error al procesar la solicitud.");
        modals.open_delete(&webhook(9, "old hook"));
        modals.confirm_delete().await;
        assert!(events.borrow().is_empty());
        assert_eq!(modals.pending_delete(), Some(9));
        assert_eq!(
            modals.view().calls.last(),
            Some(&Shown::Alert("Error al procesar la solicitud.".to_string()))
        );
    }
}
