use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

/// Envelope every server endpoint answers with.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T> {
        if !(200..300).contains(&self.status) {
            bail!(
                "server answered {}: {}",
                self.status,
                self.error.as_deref().unwrap_or("no error message")
            );
        }
        self.result
            .ok_or_else(|| anyhow!("server answered {} without a result", self.status))
    }
}
