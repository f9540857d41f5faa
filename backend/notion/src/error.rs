use thiserror::Error;

/// Failures talking to the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Notion HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode Notion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not resolve parent: {0}")]
    ParentNotFound(String),

    #[error("no title property found in this database")]
    MissingTitleProperty,
}

impl NotionError {
    /// HTTP status reported by Notion, if the failure came from the API itself.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotionError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
