//! Curated catalog on the managed backend.
//!
//! Thin client over the backend's REST table and object-storage APIs: the
//! `library_books` table holds the curated entries, the `books` bucket the
//! uploaded documents. No transaction or consistency logic lives here.

use serde::Deserialize;

use crate::error::{LibraryError, Result};
use crate::types::{BookDraft, BookSource, LibraryBook};

const TABLE: &str = "library_books";
const BUCKET: &str = "books";

/// Connection settings for the managed backend
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
struct BookRow {
    id: serde_json::Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    category: String,
    cover_url: Option<String>,
    file_url: Option<String>,
}

fn row_id(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// REST client for the curated `library_books` table
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// All curated entries, newest first
    pub async fn list(&self) -> Result<Vec<LibraryBook>> {
        let url = format!("{}?select=*&order=created_at.desc", self.table_url());
        let response = self.authed(self.http.get(&url)).send().await?;
        let rows: Vec<BookRow> = Self::ensure_success(response).await?.json().await?;

        Ok(rows
            .into_iter()
            .map(|row| LibraryBook {
                id: row_id(&row.id),
                title: row.title,
                author: row.author,
                cover_url: row.cover_url.unwrap_or_default(),
                description: format!("Categoría: {}", row.category),
                category: Some(row.category),
                source: BookSource::Catalog,
                can_embed: true,
                source_link: None,
                google_id: None,
                file_url: row.file_url,
            })
            .collect())
    }

    pub async fn insert(&self, draft: &BookDraft) -> Result<()> {
        let response = self
            .authed(self.http.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&[draft])
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    pub async fn update(&self, id: &str, draft: &BookDraft) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(), urlencoding::encode(id));
        let response = self
            .authed(self.http.patch(&url))
            .header("Prefer", "return=minimal")
            .json(draft)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Delete one entry, verifying a row was actually removed.
    ///
    /// The delete asks for the removed representation back; an empty result
    /// means row-level security silently rejected it (or the entry was
    /// already gone), which is surfaced as [`LibraryError::DeleteRejected`].
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(), urlencoding::encode(id));
        let response = self
            .authed(self.http.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let removed: Vec<serde_json::Value> = Self::ensure_success(response).await?.json().await?;

        if removed.is_empty() {
            return Err(LibraryError::DeleteRejected);
        }
        Ok(())
    }

    /// Remove the stored document behind a public storage URL.
    ///
    /// URLs that do not point into this backend's bucket are ignored.
    pub async fn remove_object(&self, file_url: &str) -> Result<()> {
        let marker = format!("/storage/v1/object/public/{}/", BUCKET);
        let Some(name) = file_url.split(&marker).nth(1).filter(|n| !n.is_empty()) else {
            return Ok(());
        };
        let name = urlencoding::decode(name)
            .map(|n| n.into_owned())
            .unwrap_or_else(|_| name.to_string());

        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, BUCKET, name);
        let response = self.authed(self.http.delete(&url)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LibraryError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}
