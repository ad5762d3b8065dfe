//! Data models for the bookmarks service
//!
//! This module defines the stored bookmark record and the validated shapes
//! that flow from the request layer into storage.

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize;

/// A bookmark record as stored in the database
///
/// # Example
/// ```json
/// {
///   "id": 1,
///   "title": "Rust",
///   "url": "https://www.rust-lang.org",
///   "description": "The Rust programming language",
///   "rating": 5
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Identifier assigned by storage on insert, never reused
    pub id: u64,

    pub title: String,

    /// Absolute http/https URL, kept exactly as the client sent it
    pub url: String,

    /// Free text, `null` when not supplied
    #[serde(default)]
    pub description: Option<String>,

    /// Integer score between 0 and 5
    pub rating: u8,
}

impl Bookmark {
    /// Returns a copy with `title` and `description` safe to render as HTML
    ///
    /// Records are already sanitized before they are written, so for rows
    /// written by this service this is a no-op. It still runs on every read
    /// to cover rows that reached the table some other way.
    pub fn sanitized(self) -> Self {
        Self {
            title: sanitize(&self.title),
            description: self.description.as_deref().map(sanitize),
            ..self
        }
    }

    /// Location of this record relative to the API root
    pub fn location(&self) -> String {
        format!("/bookmarks/{}", self.id)
    }

    /// Overwrites the fields present in `patch`, leaving the rest untouched
    pub fn apply(&mut self, patch: &BookmarkPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }
}

/// A validated create payload, without an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: u8,
}

impl NewBookmark {
    pub fn sanitized(self) -> Self {
        Self {
            title: sanitize(&self.title),
            description: self.description.as_deref().map(sanitize),
            ..self
        }
    }

    /// Attaches the storage-assigned id
    pub fn into_bookmark(self, id: u64) -> Bookmark {
        Bookmark {
            id,
            title: self.title,
            url: self.url,
            description: self.description,
            rating: self.rating,
        }
    }
}

/// A validated partial update
///
/// `None` means "leave the field as it is". For `description` the inner
/// option distinguishes setting a value from clearing it with `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<Option<String>>,
    pub rating: Option<u8>,
}

impl BookmarkPatch {
    pub fn sanitized(self) -> Self {
        Self {
            title: self.title.as_deref().map(sanitize),
            description: self
                .description
                .map(|description| description.as_deref().map(sanitize)),
            ..self
        }
    }
}
