//! Destination seam used by the gateway.

use async_trait::async_trait;
use serde::Serialize;

use notionforge_markdown::Block;

use crate::error::NotionError;

/// A page created in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub id: String,
    pub url: Option<String>,
    /// Number of requests used to upload the children.
    pub batches: usize,
}

/// Anything that can turn a title plus converted blocks into a page.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store name used in logs.
    fn name(&self) -> &str;

    /// Creates a page holding `blocks`, uploading them in API-sized batches.
    async fn create_page(&self, title: &str, blocks: &[Block]) -> Result<PageRef, NotionError>;
}
