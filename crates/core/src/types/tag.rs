//! Customer tag names.
//!
//! Shopify sends a customer's tags as one comma-separated string
//! (`"hello, world"`). Tags are shared across customers and deduplicated
//! without regard to case.

use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TagName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TagNameError {
    /// The input is empty after trimming.
    #[error("tag name cannot be empty")]
    Empty,
}

/// A single tag name.
///
/// ## Constraints
///
/// - Leading and trailing whitespace is removed
/// - Must not be empty; there is no upper length limit
///
/// ## Examples
///
/// ```
/// use shopsync_core::TagName;
///
/// let tag = TagName::parse("  VIP ").unwrap();
/// assert_eq!(tag.as_str(), "VIP");
/// assert_eq!(tag.normalized(), "vip");
///
/// assert!(TagName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Parse a `TagName` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty.
    pub fn parse(s: &str) -> Result<Self, TagNameError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(TagNameError::Empty);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the tag name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for global deduplication (lowercased).
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Consumes the `TagName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagName {
    type Error = TagNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TagName> for String {
    fn from(tag: TagName) -> Self {
        tag.0
    }
}

/// Split a comma-separated tag string into distinct tag names.
///
/// Entries are trimmed and empty entries are skipped. Duplicates
/// are removed case-insensitively, keeping the first spelling seen, and the
/// original order is preserved.
///
/// ```
/// use shopsync_core::parse_tag_list;
///
/// let tags = parse_tag_list("hello, world,,Hello ");
/// let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
/// assert_eq!(names, ["hello", "world"]);
/// ```
#[must_use]
pub fn parse_tag_list(raw: &str) -> Vec<TagName> {
    let mut seen = HashSet::new();
    raw.split(',')
        .filter_map(|part| TagName::parse(part).ok())
        .filter(|tag| seen.insert(tag.normalized()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(tags: &[TagName]) -> Vec<&str> {
        tags.iter().map(TagName::as_str).collect()
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(TagName::parse("  tag1 ").unwrap().as_str(), "tag1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(TagName::parse(""), Err(TagNameError::Empty));
        assert_eq!(TagName::parse(" \t "), Err(TagNameError::Empty));
    }

    #[test]
    fn test_parse_accepts_long_names() {
        let long = "a".repeat(300);
        assert_eq!(TagName::parse(&long).unwrap().as_str(), long);
    }

    #[test]
    fn test_tag_list_splits_and_trims() {
        let tags = parse_tag_list("hello, secondtag, shorttag, world");
        assert_eq!(names(&tags), ["hello", "secondtag", "shorttag", "world"]);
    }

    #[test]
    fn test_tag_list_empty_string() {
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ,").is_empty());
    }

    #[test]
    fn test_tag_list_dedupes_case_insensitively() {
        let tags = parse_tag_list("VIP, vip, Wholesale, vip ");
        assert_eq!(names(&tags), ["VIP", "Wholesale"]);
    }

    #[test]
    fn test_tag_list_keeps_long_entries() {
        let long = "x".repeat(300);
        let raw = format!("ok, {long} ");
        assert_eq!(names(&parse_tag_list(&raw)), ["ok", long.as_str()]);
    }

    #[test]
    fn test_serde_rejects_blank() {
        assert!(serde_json::from_str::<TagName>("\"  \"").is_err());
        let tag: TagName = serde_json::from_str("\" a \"").unwrap();
        assert_eq!(tag.as_str(), "a");
    }
}
