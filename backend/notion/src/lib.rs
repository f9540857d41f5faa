//! Notion publishing for converted markdown.
//!
//! Resolves the configured parent, creates a page with the first batch of
//! blocks and appends the rest in batches the API accepts.

pub mod client;
pub mod error;
pub mod ids;
pub mod paginate;
pub mod store;

pub use client::{NotionClient, Parent, ParentKind, NOTION_API_BASE, NOTION_VERSION, TITLE_LIMIT};
pub use error::NotionError;
pub use ids::normalize_notion_id;
pub use paginate::paginate;
pub use store::{DocumentStore, PageRef};
