//! Community forum posts.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ForumPostId;
use crate::validation::{self, ValidationError};

pub const TITLE_MAX: usize = 200;
pub const CONTENT_MAX: usize = 10_000;

/// The fixed set of forum boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForumCategory {
    TipsAndTricks,
    News,
    Requests,
    Support,
}

impl ForumCategory {
    /// All boards in display order.
    pub const ALL: [Self; 4] = [Self::TipsAndTricks, Self::News, Self::Requests, Self::Support];

    /// Wire and storage token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TipsAndTricks => "TipsAndTricks",
            Self::News => "News",
            Self::Requests => "Requests",
            Self::Support => "Support",
        }
    }

    /// Human-readable board name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TipsAndTricks => "Tips and Tricks",
            Self::News => "News",
            Self::Requests => "Requests",
            Self::Support => "Support",
        }
    }
}

impl fmt::Display for ForumCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForumCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "forum category",
                value: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: ForumPostId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub category: ForumCategory,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/forum/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewForumPost {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub category: ForumCategory,
}

impl NewForumPost {
    /// Trim the title and content; blank content becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for a blank title, or
    /// [`ValidationError::TooLong`] when a field exceeds its column.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        let title = validation::required("Post title", &self.title)?;
        validation::max_len("Post title", title, TITLE_MAX)?;

        let content = validation::optional(self.content.as_deref());
        if let Some(content) = &content {
            validation::max_len("Post content", content, CONTENT_MAX)?;
        }

        Ok(Self {
            title: title.to_owned(),
            content,
            category: self.category,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(
            "tipsandtricks".parse::<ForumCategory>().unwrap(),
            ForumCategory::TipsAndTricks
        );
        assert!("gossip".parse::<ForumCategory>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ForumCategory::TipsAndTricks.label(), "Tips and Tricks");
        assert_eq!(ForumCategory::Support.label(), "Support");
    }

    #[test]
    fn test_validate_trims() {
        let post = NewForumPost {
            title: "  Keeping tulips upright ".to_string(),
            content: Some("   ".to_string()),
            category: ForumCategory::TipsAndTricks,
        }
        .validate()
        .unwrap();
        assert_eq!(post.title, "Keeping tulips upright");
        assert_eq!(post.content, None);
    }

    #[test]
    fn test_validate_requires_title() {
        let err = NewForumPost {
            title: String::new(),
            content: Some("body".to_string()),
            category: ForumCategory::News,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Post title is required.");
    }

    #[test]
    fn test_unknown_category_fails_to_deserialize() {
        let result = serde_json::from_str::<NewForumPost>(r#"{"title":"x","category":"Gossip"}"#);
        assert!(result.is_err());
    }
}
