//! Google Drive share-link rewriting.
//!
//! Stored document URLs pasted by an administrator often point at a Drive
//! share page; the reader needs the `/preview` form, which embeds without
//! restrictive headers.

use std::sync::LazyLock;

use regex::Regex;

// Common id carriers: /file/d/<id>/..., ?id=<id>, open?id=<id>
static FILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("invalid regex"));
static ID_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").expect("invalid regex"));

/// Rewrite a Drive share URL to its `/preview` embed form.
///
/// Non-Drive URLs and Drive URLs with no recognizable file id pass through
/// unchanged.
pub fn rewrite_drive_link(url: &str) -> String {
    if !url.contains("drive.google.com") {
        return url.to_string();
    }

    let id = FILE_PATH_RE
        .captures(url)
        .or_else(|| ID_PARAM_RE.captures(url))
        .and_then(|captures| captures.get(1));

    match id {
        Some(m) => format!("https://drive.google.com/file/d/{}/preview", m.as_str()),
        None => url.to_string(),
    }
}
