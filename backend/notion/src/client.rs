use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use notionforge_markdown::{Block, MAX_CHILDREN};

use crate::error::NotionError;
use crate::ids::normalize_notion_id;
use crate::paginate::paginate;
use crate::store::{DocumentStore, PageRef};

pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion truncates nothing itself; titles longer than this are rejected.
pub const TITLE_LIMIT: usize = 2000;

/// How the configured parent id should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    /// Post straight under the page without a lookup.
    #[default]
    Page,
    /// Look the database up to find its title property.
    Database,
    /// Probe as a database first, then as a page.
    Auto,
}

impl FromStr for ParentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" => Ok(ParentKind::Page),
            "database" => Ok(ParentKind::Database),
            "auto" => Ok(ParentKind::Auto),
            other => Err(format!("unknown parent type '{other}'")),
        }
    }
}

/// A resolved parent, ready to be referenced by a create-page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    Page { id: String },
    Database { id: String, title_property: String },
}

impl Parent {
    fn reference(&self) -> Value {
        match self {
            Parent::Page { id } => json!({ "page_id": id }),
            Parent::Database { id, .. } => json!({ "database_id": id }),
        }
    }

    fn title_property(&self) -> &str {
        match self {
            Parent::Page { .. } => "title",
            Parent::Database { title_property, .. } => title_property,
        }
    }
}

#[derive(Deserialize)]
struct DatabaseObject {
    #[serde(default)]
    properties: HashMap<String, PropertySchema>,
}

#[derive(Deserialize)]
struct PropertySchema {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Serialize)]
struct AppendChildren<'a> {
    children: &'a [Block],
}

/// Notion REST client bound to one integration token and parent.
pub struct NotionClient {
    http: Client,
    token: String,
    parent_id: String,
    parent_kind: ParentKind,
    base_url: String,
    version: String,
    batch_size: usize,
}

impl NotionClient {
    pub fn new(token: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            parent_id: parent_id.into(),
            parent_kind: ParentKind::default(),
            base_url: NOTION_API_BASE.to_string(),
            version: NOTION_VERSION.to_string(),
            batch_size: MAX_CHILDREN,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_parent_kind(mut self, kind: ParentKind) -> Self {
        self.parent_kind = kind;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, NotionError> {
        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path, "Sending request to Notion");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(NotionError::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn lookup_database(&self, id: &str) -> Result<Parent, NotionError> {
        let database: DatabaseObject = self
            .send(Method::GET, &format!("/databases/{id}"), None)
            .await?;
        let title_property = database
            .properties
            .into_iter()
            .find(|(_, schema)| schema.kind == "title")
            .map(|(name, _)| name)
            .ok_or(NotionError::MissingTitleProperty)?;
        Ok(Parent::Database {
            id: id.to_string(),
            title_property,
        })
    }

    async fn lookup_page(&self, id: &str) -> Result<Parent, NotionError> {
        let _: Value = self.send(Method::GET, &format!("/pages/{id}"), None).await?;
        Ok(Parent::Page { id: id.to_string() })
    }

    /// Works out whether the configured parent is a page or a database.
    pub async fn resolve_parent(&self) -> Result<Parent, NotionError> {
        let id = normalize_notion_id(&self.parent_id);
        match self.parent_kind {
            ParentKind::Page => Ok(Parent::Page { id }),
            ParentKind::Database => self.lookup_database(&id).await,
            ParentKind::Auto => match self.lookup_database(&id).await {
                Ok(parent) => Ok(parent),
                Err(NotionError::MissingTitleProperty) => Err(NotionError::MissingTitleProperty),
                Err(db_err) => self.lookup_page(&id).await.map_err(|page_err| {
                    NotionError::ParentNotFound(format!(
                        "Database error: {db_err} / Page error: {page_err}"
                    ))
                }),
            },
        }
    }
}

/// Picks the most useful message out of a Notion error body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        format!("Request failed with status {status}")
    } else {
        body.to_string()
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    fn name(&self) -> &str {
        "notion"
    }

    async fn create_page(&self, title: &str, blocks: &[Block]) -> Result<PageRef, NotionError> {
        let parent = self.resolve_parent().await?;
        let title: String = title.chars().take(TITLE_LIMIT).collect();

        let mut batches = paginate(blocks, self.batch_size);
        let first = batches.next().unwrap_or(&[]);

        let mut properties = serde_json::Map::new();
        properties.insert(
            parent.title_property().to_string(),
            json!({ "title": [{ "type": "text", "text": { "content": title } }] }),
        );
        let payload = json!({
            "parent": parent.reference(),
            "properties": properties,
            "children": serde_json::to_value(first)?,
        });
        let page: PageObject = self.send(Method::POST, "/pages", Some(&payload)).await?;

        let mut uploaded = 1;
        for batch in batches {
            let body = serde_json::to_value(AppendChildren { children: batch })?;
            let _: Value = self
                .send(
                    Method::PATCH,
                    &format!("/blocks/{}/children", page.id),
                    Some(&body),
                )
                .await?;
            uploaded += 1;
        }

        info!(
            page_id = %page.id,
            blocks = blocks.len(),
            batches = uploaded,
            "Created Notion page"
        );
        Ok(PageRef {
            id: page.id,
            url: page.url,
            batches: uploaded,
        })
    }
}
