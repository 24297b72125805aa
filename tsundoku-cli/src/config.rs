use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use reqwest::Url;
use serde::Deserialize;

const DEFAULT_API: &str = "http://localhost:6439/";
const DEFAULT_LOCALE: &str = "en";

/// One layer of settings: the config file, or the command line flags.
#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub api: Option<String>,
    /// API key, sent as the `Authorization` header
    pub token: Option<String>,
    pub locale: Option<String>,
    /// directory of `<locale>/<resource>.ftl` files
    pub locales: Option<String>,
}

lazy_static::lazy_static! {
    static ref CONFIG_PATH: String = {
        let path = std::env::var("TSUNDOKU_CONFIG").unwrap_or_default();
        if path.is_empty() {
            "tsundoku.yml".to_string()
        } else {
            path
        }
    };
}

impl Config {
    /// Missing file is not an error.
    pub fn load() -> Result<Self> {
        let path = Path::new(&*CONFIG_PATH);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| anyhow!("failed to parse config {}: {e}", path.display()))
    }
}

pub struct Settings {
    pub api: Url,
    pub token: Option<String>,
    pub locale: String,
    /// `None` means the bundled translations
    pub locales: Option<PathBuf>,
}

fn pick(
    flag: Option<String>,
    env: &dyn Fn(&str) -> Option<String>,
    name: &str,
    file: Option<String>,
) -> Option<String> {
    flag.or_else(|| env(name).filter(|x| !x.is_empty()))
        .or(file)
}

impl Settings {
    /// Flag, then environment, then config file, then built-in default.
    pub fn resolve(flags: Config, file: Config) -> Result<Self> {
        Self::resolve_with(flags, file, &|name| std::env::var(name).ok())
    }

    fn resolve_with(
        flags: Config,
        file: Config,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api = pick(flags.api, env, "TSUNDOKU_API", file.api)
            .unwrap_or_else(|| DEFAULT_API.to_string());
        let api = api
            .parse::<Url>()
            .map_err(|e| anyhow!("failed to parse '{api}' as URL: {e}"))?;
        Ok(Self {
            api,
            token: pick(flags.token, env, "TSUNDOKU_TOKEN", file.token),
            locale: pick(flags.locale, env, "TSUNDOKU_LOCALE", file.locale)
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            locales: pick(flags.locales, env, "TSUNDOKU_LOCALES", file.locales)
                .map(PathBuf::from),
        })
    }
}
