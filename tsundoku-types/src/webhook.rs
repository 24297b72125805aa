use serde::{Deserialize, Serialize};

/// Server-side webhook configuration, shared by every show it is attached to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookBase {
    pub name: String,
    /// stable server-assigned identifier, addresses `/api/webhooks/{base_id}`
    pub base_id: u64,
    /// `discord`, `slack` or `custom`
    pub service: String,
    pub url: String,
    /// message template, `{name}` and `{episode}` are substituted by the server
    pub content_fmt: String,
    #[serde(default)]
    pub valid: bool,
}

/// A webhook base attached to one show, with the triggers it fires on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Webhook {
    pub wh_id: u64,
    pub show_id: u64,
    #[serde(default)]
    pub triggers: Vec<String>,
    pub base: WebhookBase,
}
