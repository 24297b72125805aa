#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate log;

pub mod client;
pub mod l10n;
pub mod toggle;
pub mod webhooks;

#[cfg(test)]
mod test_log;

pub use client::{HttpClient, WebhookClient};
pub use l10n::{Injector, L10nConfig, Translations, FALLBACK_LOCALE};
pub use toggle::{ShowToggle, ToggleProps, ToggleRender, ToggleSource};
pub use webhooks::{Dialog, Form, View, WebhookEvent, WebhookModals};
