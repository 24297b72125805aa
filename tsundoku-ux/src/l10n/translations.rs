use std::{collections::HashMap, fs, path::Path};

use anyhow::Result;

/// Fluent resource texts keyed by `<locale>/<resource>.ftl`.
#[derive(Clone, Debug, Default)]
pub struct Translations {
    resources: HashMap<String, String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(locale: &str, resource: &str) -> String {
        format!("{locale}/{resource}.ftl")
    }

    pub fn insert(&mut self, locale: &str, resource: &str, text: impl Into<String>) {
        self.resources
            .insert(Self::key(locale, resource), text.into());
    }

    pub fn get(&self, locale: &str, resource: &str) -> Option<&str> {
        self.resources
            .get(&Self::key(locale, resource))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Reads every `<dir>/<locale>/<resource>.ftl` below `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut out = Self::new();
        for locale in fs::read_dir(dir)? {
            let locale = locale?;
            if !locale.file_type()?.is_dir() {
                continue;
            }
            let locale_name = locale.file_name().to_string_lossy().into_owned();
            for file in fs::read_dir(locale.path())? {
                let path = file?.path();
                if path.extension().and_then(|x| x.to_str()) != Some("ftl") {
                    continue;
                }
                let Some(resource) = path.file_stem().and_then(|x| x.to_str()) else {
                    continue;
                };
                let text = fs::read_to_string(&path)?;
                out.insert(&locale_name, resource, text);
            }
        }
        debug!("loaded {} translation resources from {}", out.len(), dir.display());
        Ok(out)
    }
}

/// Everything the injector needs to build its bundles.
#[derive(Clone, Debug)]
pub struct L10nConfig {
    /// active locale, e.g. `es`
    pub locale: String,
    pub translations: Translations,
}

impl L10nConfig {
    pub fn new(locale: impl Into<String>, translations: Translations) -> Self {
        Self {
            locale: locale.into(),
            translations,
        }
    }
}
