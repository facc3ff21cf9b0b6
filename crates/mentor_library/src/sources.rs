//! Public book-search collaborators.
//!
//! Two flavors of the same volumes API: a general ebook search and a
//! free-ebook/classics search, both restricted to Spanish-language results.

use serde::Deserialize;

use crate::error::{LibraryError, Result};
use crate::types::{BookSource, LibraryBook};

/// Production endpoint; overridden in tests
pub const BOOKS_API_BASE_URL: &str = "https://www.googleapis.com";

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: String,
    #[serde(default)]
    volume_info: VolumeInfo,
    access_info: Option<AccessInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    authors: Option<Vec<String>>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    preview_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessInfo {
    embeddable: Option<bool>,
}

/// Client for the public volumes API
#[derive(Debug, Clone)]
pub struct BookSearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl BookSearchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search purchasable/preview ebooks
    pub async fn search_ebooks(&self, query: &str) -> Result<Vec<LibraryBook>> {
        let response = self.volumes(query, "ebooks", "").await?;
        Ok(response
            .items
            .into_iter()
            .map(|item| {
                let embeddable = item
                    .access_info
                    .as_ref()
                    .and_then(|a| a.embeddable)
                    .unwrap_or(false);
                book_from_volume(
                    item,
                    BookSource::Google,
                    "",
                    "Autor desconocido",
                    "Sin descripción disponible.",
                    "Otras",
                    embeddable,
                )
            })
            .collect())
    }

    /// Search free, fully readable classics
    pub async fn search_classics(&self, query: &str) -> Result<Vec<LibraryBook>> {
        let response = self.volumes(query, "free-ebooks", "&printType=books").await?;
        Ok(response
            .items
            .into_iter()
            .map(|item| {
                book_from_volume(
                    item,
                    BookSource::Classics,
                    "free_",
                    "Dominio Público",
                    "Libro completo disponible gratuitamente.",
                    "Literatura",
                    true,
                )
            })
            .collect())
    }

    async fn volumes(&self, query: &str, filter: &str, extra: &str) -> Result<VolumesResponse> {
        let url = format!(
            "{}/books/v1/volumes?q={}&maxResults=20&filter={}{}&langRestrict=es",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            filter,
            extra
        );

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LibraryError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

fn book_from_volume(
    item: Volume,
    source: BookSource,
    id_prefix: &str,
    fallback_author: &str,
    fallback_description: &str,
    category: &str,
    can_embed: bool,
) -> LibraryBook {
    let info = item.volume_info;
    LibraryBook {
        id: format!("{}{}", id_prefix, item.id),
        title: info.title,
        author: info
            .authors
            .and_then(|authors| authors.into_iter().next())
            .unwrap_or_else(|| fallback_author.to_string()),
        // Thumbnails come back over plain http; upgrade for embedding
        cover_url: info
            .image_links
            .and_then(|links| links.thumbnail)
            .map(|t| t.replacen("http:", "https:", 1))
            .unwrap_or_default(),
        description: info
            .description
            .unwrap_or_else(|| fallback_description.to_string()),
        category: Some(category.to_string()),
        source,
        can_embed,
        source_link: info.preview_link,
        google_id: Some(item.id),
        file_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn volume(id: &str, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "volumeInfo": {
                "title": title,
                "authors": ["Gabriel García Márquez"],
                "description": "Una novela.",
                "imageLinks": { "thumbnail": "http://books.example/cover.jpg" },
                "previewLink": "https://books.example/preview"
            },
            "accessInfo": { "embeddable": true }
        })
    }

    #[tokio::test]
    async fn test_search_ebooks_maps_volumes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("q", "cien años"))
            .and(query_param("filter", "ebooks"))
            .and(query_param("langRestrict", "es"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "items": [volume("v1", "Cien años de soledad")] })),
            )
            .mount(&server)
            .await;

        let books = BookSearchClient::new(server.uri())
            .search_ebooks("cien años")
            .await
            .unwrap();

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.id, "v1");
        assert_eq!(book.title, "Cien años de soledad");
        assert_eq!(book.author, "Gabriel García Márquez");
        assert_eq!(book.cover_url, "https://books.example/cover.jpg");
        assert_eq!(book.source, BookSource::Google);
        assert!(book.can_embed);
        assert_eq!(book.google_id.as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn test_search_classics_uses_free_filter_and_fallbacks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("filter", "free-ebooks"))
            .and(query_param("printType", "books"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "items": [{ "id": "c9", "volumeInfo": { "title": "El Quijote" } }] })),
            )
            .mount(&server)
            .await;

        let books = BookSearchClient::new(server.uri())
            .search_classics("quijote")
            .await
            .unwrap();

        let book = &books[0];
        assert_eq!(book.id, "free_c9");
        assert_eq!(book.author, "Dominio Público");
        assert_eq!(book.description, "Libro completo disponible gratuitamente.");
        assert_eq!(book.category.as_deref(), Some("Literatura"));
        assert_eq!(book.source, BookSource::Classics);
        assert!(book.can_embed);
    }

    #[tokio::test]
    async fn test_missing_items_yield_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "books#volumes" })))
            .mount(&server)
            .await;

        let books = BookSearchClient::new(server.uri())
            .search_ebooks("nada")
            .await
            .unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_api_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = BookSearchClient::new(server.uri())
            .search_ebooks("x")
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::Api { status: 429, .. }));
    }
}
