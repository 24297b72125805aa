use serde::{Deserialize, Serialize};

use super::ApiResponse;

/// A single nyaa.si search hit as reported by the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NyaaIndividualResult {
    /// set once the result has been attached to a show
    pub show_id: Option<u64>,
    pub title: String,
    pub post_link: String,
    pub torrent_link: String,
    /// human readable, e.g. `1.4 GiB`
    pub size: String,
    /// `%d %b %Y`
    pub published: String,
    pub seeders: u64,
    pub leechers: u64,
}

pub type NyaaSearchResult = ApiResponse<Vec<NyaaIndividualResult>>;
