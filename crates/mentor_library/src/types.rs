use serde::{Deserialize, Serialize};

/// Where a search result came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    /// Curated catalog on the managed backend
    Catalog,
    /// Google Books ebook search
    Google,
    /// Free-ebook/classics search
    Classics,
}

/// One search result, the union of the three collaborator shapes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub description: String,
    pub category: Option<String>,
    pub source: BookSource,
    pub can_embed: bool,
    /// External preview page, when the source offers one
    pub source_link: Option<String>,
    /// Volume id at the books API (embed URL derivation)
    pub google_id: Option<String>,
    /// Stored document URL for curated entries
    pub file_url: Option<String>,
}

/// Payload for creating or updating a curated catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
    pub file_url: String,
    pub cover_url: String,
}
