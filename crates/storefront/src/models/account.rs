//! Account data: addresses, orders and the customer profile.
//!
//! These arrive wholesale from the backend (at login, stored in the session)
//! and are only ever rendered. Status transitions, cancellation and reviews
//! are not performed here.

use chrono::NaiveDate;
use emporium_core::{AddressId, OrderId, OrderStatus, Price};
use serde::{Deserialize, Serialize};

/// A saved shipping address.
///
/// At most one address per customer should carry `is_default`; the backend
/// owns that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// "Home", "Work", ...
    #[serde(alias = "type")]
    pub label: String,
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "default")]
    pub is_default: bool,
}

impl Address {
    /// "City, State" line.
    #[must_use]
    pub fn locality(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, _) => self.state.clone(),
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
    pub price: Price,
}

impl LineItem {
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub date: NaiveDate,
    pub status: OrderStatus,
    pub total: Price,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, alias = "addressId")]
    pub shipping_address_id: Option<AddressId>,
    #[serde(default)]
    pub reviewed: bool,
}

impl Order {
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    #[must_use]
    pub const fn can_review(&self) -> bool {
        self.status.can_review(self.reviewed)
    }

    #[must_use]
    pub const fn can_track(&self) -> bool {
        self.status.can_track()
    }

    #[must_use]
    pub const fn can_buy_again(&self) -> bool {
        self.status.can_buy_again()
    }
}

/// Personal info plus the account's addresses and order history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl CustomerProfile {
    /// The first address flagged as default.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }

    /// The address an order ships to, if it is still on file.
    #[must_use]
    pub fn shipping_address(&self, order: &Order) -> Option<&Address> {
        let id = order.shipping_address_id?;
        self.addresses.iter().find(|address| address.id == id)
    }

    #[must_use]
    pub fn member_since(&self) -> Option<String> {
        self.join_date
            .map(|date| date.format("%B %Y").to_string())
    }
}
