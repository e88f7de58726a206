//! Data models for Linkboard
//!
//! Defines the persisted `Link` record, the static `PageMeta` set once at
//! startup, and the `PageContext` handed to the renderer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::StoreError;

/// A single link on the public page
///
/// `id` is assigned by SQLite on insert and never changes. `weight` is the
/// admin-controlled rank (higher sorts first); `hits` counts visitor clicks
/// and is tracked independently of ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// Display text (required)
    pub text: String,
    /// Target URL (required)
    pub url: String,
    /// Optional longer description; empty string when unset
    #[serde(default)]
    pub description: String,
    /// Optional image URL; empty string when unset
    #[serde(default)]
    pub image_url: String,
    /// Admin-controlled rank, unbounded in both directions
    pub weight: i64,
    /// Visitor click counter, monotonically non-decreasing
    pub hits: i64,
}

/// Fields supplied by the admin when creating or editing a link
///
/// `text` and `url` are required and validated before any SQL runs;
/// `description` and `image_url` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub text: String,
    pub url: String,
    pub description: String,
    pub image_url: String,
}

impl LinkDraft {
    pub fn new(
        text: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            description: description.into(),
            image_url: image_url.into(),
        }
    }

    /// Reject empty required fields before they reach storage
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.text.trim().is_empty() {
            return Err(StoreError::Validation { field: "text" });
        }
        if self.url.trim().is_empty() {
            return Err(StoreError::Validation { field: "url" });
        }
        Ok(())
    }
}

/// Direction for a promote/demote weight change
///
/// The enum is closed by construction; parsing arbitrary input goes through
/// `FromStr`, which surfaces anything outside {up, down} as
/// `StoreError::UnsupportedAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightAction {
    Up,
    Down,
}

impl WeightAction {
    /// The signed delta applied to the weight column
    pub fn delta(self) -> i64 {
        match self {
            WeightAction::Up => 1,
            WeightAction::Down => -1,
        }
    }
}

impl FromStr for WeightAction {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(WeightAction::Up),
            "down" => Ok(WeightAction::Down),
            other => Err(StoreError::UnsupportedAction {
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for WeightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightAction::Up => write!(f, "up"),
            WeightAction::Down => write!(f, "down"),
        }
    }
}

/// Static page metadata, set once at process start and never mutated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    pub logo_url: String,
    pub title: String,
    pub intro: String,
    /// Social network name -> profile URL; absent keys simply don't render
    #[serde(default)]
    pub social: BTreeMap<String, String>,
}

/// The render input: page metadata merged with the ranked link list
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub logo_url: String,
    pub title: String,
    pub intro: String,
    pub social: BTreeMap<String, String>,
    pub links: Vec<Link>,
}

impl PageContext {
    /// Merge static metadata with a freshly ranked link list
    pub fn assemble(meta: &PageMeta, links: Vec<Link>) -> Self {
        Self {
            logo_url: meta.logo_url.clone(),
            title: meta.title.clone(),
            intro: meta.intro.clone(),
            social: meta.social.clone(),
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_validate_ok() {
        let draft = LinkDraft::new("My Site", "https://example.com", "", "");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_validate_empty_text() {
        let draft = LinkDraft::new("", "https://example.com", "desc", "img");
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "text" }));
    }

    #[test]
    fn test_draft_validate_blank_url() {
        let draft = LinkDraft::new("text", "   ", "", "");
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "url" }));
    }

    #[test]
    fn test_weight_action_parse() {
        assert_eq!("up".parse::<WeightAction>().unwrap(), WeightAction::Up);
        assert_eq!("down".parse::<WeightAction>().unwrap(), WeightAction::Down);

        let err = "sideways".parse::<WeightAction>().unwrap_err();
        match err {
            StoreError::UnsupportedAction { action } => assert_eq!(action, "sideways"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_weight_action_delta() {
        assert_eq!(WeightAction::Up.delta(), 1);
        assert_eq!(WeightAction::Down.delta(), -1);
    }

    #[test]
    fn test_page_context_assemble() {
        let mut social = BTreeMap::new();
        social.insert("github".to_string(), "https://github.com/me".to_string());
        let meta = PageMeta {
            logo_url: "/static/logo.png".to_string(),
            title: "My Links".to_string(),
            intro: "Welcome".to_string(),
            social,
        };

        let links = vec![Link {
            id: 1,
            text: "Blog".to_string(),
            url: "https://blog.example.com".to_string(),
            description: String::new(),
            image_url: String::new(),
            weight: 0,
            hits: 0,
        }];

        let ctx = PageContext::assemble(&meta, links);
        assert_eq!(ctx.title, "My Links");
        assert_eq!(ctx.links.len(), 1);
        assert_eq!(ctx.social["github"], "https://github.com/me");
    }
}
