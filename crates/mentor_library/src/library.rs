//! Library facade.
//!
//! Synchronous view over the search and catalog collaborators. Search
//! failures degrade to an empty result set (an empty library is a valid
//! state); admin operations surface their errors.

use tokio::runtime::Runtime;

use crate::catalog::{CatalogClient, CatalogConfig};
use crate::drive::rewrite_drive_link;
use crate::error::{LibraryError, Result};
use crate::sources::{BookSearchClient, BOOKS_API_BASE_URL};
use crate::types::{BookDraft, BookSource, LibraryBook};

/// Configuration for the library facade
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Managed-backend settings; without them the curated catalog is
    /// offline and lists as empty
    pub catalog: Option<CatalogConfig>,
    /// Base URL of the public books API
    pub books_api_url: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            books_api_url: BOOKS_API_BASE_URL.to_string(),
        }
    }
}

/// Synchronous facade over the three book sources
pub struct Library {
    runtime: Runtime,
    search_client: BookSearchClient,
    catalog: Option<CatalogClient>,
}

impl Library {
    pub fn new(config: LibraryConfig) -> Result<Self> {
        Ok(Self {
            runtime: Runtime::new()?,
            search_client: BookSearchClient::new(config.books_api_url),
            catalog: config.catalog.map(CatalogClient::new),
        })
    }

    /// Search one source.
    ///
    /// The curated catalog lists everything (newest first) and filters
    /// client-side by title/description when a query is given; the public
    /// sources need a non-blank query. Collaborator failures are logged and
    /// yield an empty list.
    pub fn search(&self, source: BookSource, query: &str) -> Vec<LibraryBook> {
        let query = query.trim();
        match source {
            BookSource::Catalog => {
                let Some(catalog) = &self.catalog else {
                    tracing::warn!("curated catalog is offline (no backend configured)");
                    return Vec::new();
                };
                let books = match self.runtime.block_on(catalog.list()) {
                    Ok(books) => books,
                    Err(error) => {
                        tracing::warn!(%error, "curated catalog listing failed");
                        return Vec::new();
                    }
                };
                if query.is_empty() {
                    return books;
                }
                let needle = query.to_lowercase();
                books
                    .into_iter()
                    .filter(|b| {
                        b.title.to_lowercase().contains(&needle)
                            || b.description.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
            BookSource::Google | BookSource::Classics => {
                if query.is_empty() {
                    return Vec::new();
                }
                let result = self.runtime.block_on(async {
                    match source {
                        BookSource::Google => self.search_client.search_ebooks(query).await,
                        _ => self.search_client.search_classics(query).await,
                    }
                });
                match result {
                    Ok(books) => books,
                    Err(error) => {
                        tracing::warn!(%error, ?source, "book search failed");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Add a curated entry; Drive share links are rewritten to embed form
    pub fn add_book(&self, mut draft: BookDraft) -> Result<()> {
        let catalog = self.require_catalog()?;
        draft.file_url = rewrite_drive_link(&draft.file_url);
        self.runtime.block_on(catalog.insert(&draft))
    }

    /// Update a curated entry in place
    pub fn update_book(&self, id: &str, mut draft: BookDraft) -> Result<()> {
        let catalog = self.require_catalog()?;
        draft.file_url = rewrite_drive_link(&draft.file_url);
        self.runtime.block_on(catalog.update(id, &draft))
    }

    /// Delete a curated entry, then best-effort remove its stored document.
    ///
    /// A failure to remove the document is logged, not propagated; the
    /// table row is already gone and the state is acceptable.
    pub fn delete_book(&self, id: &str, file_url: Option<&str>) -> Result<()> {
        let catalog = self.require_catalog()?;
        self.runtime.block_on(catalog.delete(id))?;

        if let Some(url) = file_url {
            if let Err(error) = self.runtime.block_on(catalog.remove_object(url)) {
                tracing::warn!(%error, "stored document could not be removed");
            }
        }
        Ok(())
    }

    /// URL the reader should embed for a book, if it is readable at all
    pub fn embed_url(book: &LibraryBook) -> Option<String> {
        if !book.can_embed {
            return None;
        }
        match book.source {
            BookSource::Catalog => book.file_url.clone(),
            BookSource::Google | BookSource::Classics => book.google_id.as_ref().map(|id| {
                format!(
                    "https://books.google.com/books?id={}&printsec=frontcover&output=embed",
                    id
                )
            }),
        }
    }

    fn require_catalog(&self) -> Result<&CatalogClient> {
        self.catalog
            .as_ref()
            .ok_or_else(|| LibraryError::Config("curated catalog backend not configured".into()))
    }
}
