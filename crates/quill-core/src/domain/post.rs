use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Persisted value of a post without an uploaded cover image.
pub const NO_IMAGE: &str = "noimage.jpg";

/// Cover image of a post - either the placeholder or a blob store filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoverImage {
    Placeholder,
    Stored(String),
}

impl CoverImage {
    /// Value written to the `cover_image` column.
    pub fn as_str(&self) -> &str {
        match self {
            CoverImage::Placeholder => NO_IMAGE,
            CoverImage::Stored(name) => name,
        }
    }

    /// Blob store filename, if an image was uploaded.
    pub fn stored_name(&self) -> Option<&str> {
        match self {
            CoverImage::Placeholder => None,
            CoverImage::Stored(name) => Some(name),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CoverImage::Placeholder)
    }
}

impl From<String> for CoverImage {
    fn from(value: String) -> Self {
        if value.is_empty() || value == NO_IMAGE {
            CoverImage::Placeholder
        } else {
            CoverImage::Stored(value)
        }
    }
}

impl From<CoverImage> for String {
    fn from(cover: CoverImage) -> Self {
        match cover {
            CoverImage::Placeholder => NO_IMAGE.to_string(),
            CoverImage::Stored(name) => name,
        }
    }
}

impl fmt::Display for CoverImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity - a single blog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub body: String,
    pub cover_image: CoverImage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `owner_id`, stamped with `now`.
    pub fn new(
        owner_id: Uuid,
        content: PostContent,
        cover_image: CoverImage,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: content.title,
            body: content.body,
            cover_image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Title and body as submitted by the author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub title: String,
    pub body: String,
}

impl PostContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Both fields are required. Every missing field is reported at once.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title is required");
        }
        if self.body.trim().is_empty() {
            missing.push("body is required");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(missing.join(", ")))
        }
    }
}

/// A page of results, 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total_items: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total_items.div_ceil(per_page)
        };
        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_image_sentinel_round_trip() {
        assert_eq!(CoverImage::from(NO_IMAGE.to_string()), CoverImage::Placeholder);
        assert_eq!(CoverImage::from(String::new()), CoverImage::Placeholder);
        assert_eq!(String::from(CoverImage::Placeholder), NO_IMAGE);

        let stored = CoverImage::from("photo_1700000000.png".to_string());
        assert_eq!(stored.stored_name(), Some("photo_1700000000.png"));
        assert!(!stored.is_placeholder());
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let err = PostContent::new("", "  ").validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "title is required, body is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(PostContent::new("Title", "Body").validate().is_ok());
    }

    #[test]
    fn test_page_totals() {
        let page = Page::new(vec![1, 2, 3], 1, 10, 23);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());

        let empty: Page<u8> = Page::new(vec![], 1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
    }
}
