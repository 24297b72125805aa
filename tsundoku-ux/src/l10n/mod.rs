use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use unic_langid::LanguageIdentifier;

mod translations;
pub use translations::*;

/// Locale consulted when a key is absent from the active locale.
pub const FALLBACK_LOCALE: &str = "en";

/// Resolves message keys against the active locale, then [`FALLBACK_LOCALE`],
/// then the key itself.
pub struct Injector {
    locale: String,
    bundle: FluentBundle<FluentResource>,
    fallback: FluentBundle<FluentResource>,
}

impl Injector {
    pub fn new(config: &L10nConfig, resources: &[&str]) -> Self {
        Self {
            locale: config.locale.clone(),
            bundle: build_bundle(&config.locale, &config.translations, resources),
            fallback: build_bundle(FALLBACK_LOCALE, &config.translations, resources),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Never fails: a key missing from both locales is logged and returned as is.
    pub fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(out) = render(&self.bundle, key, args) {
            return out;
        }
        if let Some(out) = render(&self.fallback, key, args) {
            return out;
        }
        error!(
            "Key {} missing completely from desired ({}) and fallback ({}) locales.",
            key, self.locale, FALLBACK_LOCALE
        );
        key.to_string()
    }
}

fn build_bundle(
    locale: &str,
    translations: &Translations,
    resources: &[&str],
) -> FluentBundle<FluentResource> {
    let langid: LanguageIdentifier = match locale.parse() {
        Ok(x) => x,
        Err(e) => {
            warn!("invalid locale '{}': {}", locale, e);
            LanguageIdentifier::default()
        }
    };
    let mut bundle = FluentBundle::new(vec![langid]);
    bundle.set_use_isolating(false);

    for name in resources {
        let Some(source) = translations.get(locale, name) else {
            warn!("missing translation resource {}", Translations::key(locale, name));
            continue;
        };
        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(x) => x,
            Err((partial, errors)) => {
                warn!(
                    "syntax errors in {}: {:?}",
                    Translations::key(locale, name),
                    errors
                );
                partial
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(
                "conflicting messages in {}: {:?}",
                Translations::key(locale, name),
                errors
            );
        }
    }
    bundle
}

fn render(
    bundle: &FluentBundle<FluentResource>,
    key: &str,
    args: Option<&FluentArgs>,
) -> Option<String> {
    let pattern = bundle.get_message(key)?.value()?;
    let mut errors = vec![];
    let out = bundle.format_pattern(pattern, args, &mut errors);
    if !errors.is_empty() {
        debug!("formatting {}: {:?}", key, errors);
    }
    Some(out.into_owned())
}
