//! Customer account state.

use serde::{Deserialize, Serialize};

/// Error returned when a customer state string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid customer state: {0}")]
pub struct CustomerStateError(pub String);

/// Customer account state, as reported by Shopify.
///
/// Webhook payloads carry the lowercase names. The enable/disable webhooks
/// force `Enabled`/`Disabled` regardless of what the payload says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "webhooks.customer_state", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum CustomerState {
    /// Account exists but the customer cannot log in.
    #[default]
    Disabled,
    /// An account invite has been sent.
    Invited,
    /// The customer has an active account.
    Enabled,
    /// The customer declined the account invite.
    Declined,
}

impl CustomerState {
    /// Lowercase wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Invited => "invited",
            Self::Enabled => "enabled",
            Self::Declined => "declined",
        }
    }
}

impl std::fmt::Display for CustomerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustomerState {
    type Err = CustomerStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "invited" => Ok(Self::Invited),
            "enabled" => Ok(Self::Enabled),
            "declined" => Ok(Self::Declined),
            _ => Err(CustomerStateError(s.to_owned())),
        }
    }
}
