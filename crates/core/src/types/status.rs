//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
///
/// The storefront never transitions an order; it only decides which
/// affordances to show for the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[serde(alias = "DELIVERED", alias = "Delivered")]
    Delivered,
    #[serde(alias = "PROCESSING", alias = "Processing")]
    Processing,
    #[serde(alias = "SHIPPED", alias = "Shipped")]
    Shipped,
    #[serde(alias = "CANCELLED", alias = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS modifier used by the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Delivered => "badge--success",
            Self::Processing => "badge--warning",
            Self::Shipped => "badge--info",
            Self::Cancelled => "badge--danger",
        }
    }

    /// Only orders that have not left the warehouse can be cancelled.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Processing)
    }

    #[must_use]
    pub const fn can_track(self) -> bool {
        matches!(self, Self::Shipped)
    }

    /// Whether a review may be written, given the order's reviewed flag.
    #[must_use]
    pub const fn can_review(self, reviewed: bool) -> bool {
        matches!(self, Self::Delivered) && !reviewed
    }

    #[must_use]
    pub const fn can_buy_again(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Roles carried in the stored user record.
///
/// Role checks compare exact strings, so the wire names are the
/// `ROLE_`-prefixed forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_CUSTOMER")]
    Customer,
}

impl Role {
    /// The exact string stored in a user's role list.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::Customer => "ROLE_CUSTOMER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_ADMIN" => Ok(Self::Admin),
            "ROLE_CUSTOMER" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
