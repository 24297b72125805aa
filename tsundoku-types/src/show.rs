use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Webhook;

/// Kitsu metadata attached 1:1 to a show.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub show_id: u64,
    pub kitsu_id: Option<u64>,
    pub slug: Option<String>,
    pub status: Option<String>,
    /// pre-rendered status tag
    pub html_status: Option<String>,
    pub poster: Option<String>,
    pub link: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum EntryState {
    Downloading,
    Downloaded,
    Renamed,
    Moved,
    Completed,
    Other(String),
}

impl From<String> for EntryState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "downloading" => EntryState::Downloading,
            "downloaded" => EntryState::Downloaded,
            "renamed" => EntryState::Renamed,
            "moved" => EntryState::Moved,
            "completed" => EntryState::Completed,
            _ => EntryState::Other(value),
        }
    }
}

impl From<EntryState> for String {
    fn from(value: EntryState) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryState::Downloading => write!(f, "downloading"),
            EntryState::Downloaded => write!(f, "downloaded"),
            EntryState::Renamed => write!(f, "renamed"),
            EntryState::Moved => write!(f, "moved"),
            EntryState::Completed => write!(f, "completed"),
            EntryState::Other(x) => write!(f, "{}", x),
        }
    }
}

/// Lightweight view of an episode-tracking record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialEntry {
    pub id: u64,
    pub show_id: u64,
    pub state: EntryState,
    pub episode: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Show {
    pub id_: u64,
    pub title: String,
    /// rename template, e.g. `{n} - {s00e00}`
    pub desired_format: Option<String>,
    pub desired_folder: Option<String>,
    pub season: u32,
    pub episode_offset: i32,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub entries: Vec<PartialEntry>,
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
    /// whether the poller downloads new releases of this show
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,
    /// whether finished downloads get renamed and moved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_process: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Show {
    /// Highest episode number tracked for this show, if any.
    pub fn latest_episode(&self) -> Option<u32> {
        self.entries.iter().map(|x| x.episode).max()
    }
}
