//! Site identifier taken from the webhook URL.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SiteId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteIdError {
    /// The input string is empty.
    #[error("site id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("site id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("site id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// The `<site-id>` segment of `/webhooks/shopify/<site-id>/<event>`.
///
/// Selects which configured site a delivery belongs to.
///
/// ```
/// use shopsync_core::SiteId;
///
/// assert!(SiteId::parse("abcd").is_ok());
/// assert!(SiteId::parse("main-store_2").is_ok());
/// assert!(SiteId::parse("").is_err());
/// assert!(SiteId::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct SiteId(String);

impl SiteId {
    /// Maximum length of a site id.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `SiteId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 64 characters, or
    /// contains anything other than ASCII letters, digits, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, SiteIdError> {
        if s.is_empty() {
            return Err(SiteIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SiteIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SiteIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the site id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SiteId {
    type Err = SiteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SiteId {
    type Error = SiteIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SiteId> for String {
    fn from(site: SiteId) -> Self {
        site.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(SiteId::parse("abcd").unwrap().as_str(), "abcd");
        assert!(SiteId::parse("A-1_b").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SiteId::parse(""), Err(SiteIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            SiteId::parse(&"a".repeat(65)),
            Err(SiteIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            SiteId::parse("my site"),
            Err(SiteIdError::InvalidCharacter(' '))
        );
        assert_eq!(SiteId::parse("../x"), Err(SiteIdError::InvalidCharacter('.')));
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<SiteId>("\"abcd\"").is_ok());
        assert!(serde_json::from_str::<SiteId>("\"a b\"").is_err());
    }
}
