use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Drive API rejected request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub web_link: String,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    files: Vec<DriveFile>,
}

/// Thin client for the cloud-drive HTTP API. Each season maps to one
/// shared folder, addressed by season id.
pub struct DriveClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DriveClient {
    pub fn from_config() -> Self {
        let integrations = &config::config().integrations;
        Self {
            client: reqwest::Client::new(),
            base_url: integrations.drive_url.clone(),
            api_key: integrations.drive_api_key.clone(),
        }
    }

    pub async fn list_files(&self, season_id: Uuid) -> Result<Vec<DriveFile>, DriveError> {
        let response = self
            .client
            .get(format!("{}/folders/{}/files", self.base_url, season_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DriveError::Rejected(response.status().to_string()));
        }

        let list: FileList = response.json().await?;
        Ok(list.files)
    }
}
