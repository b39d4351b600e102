//! Account route handlers.
//!
//! These routes sit behind the auth guard. Everything shown comes from the
//! customer profile stored in the session at login; nothing is fetched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Path,
    response::{IntoResponse, Redirect},
};
use emporium_core::OrderId;
use serde::Deserialize;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::{SessionAuth, Visitor};
use crate::models::{Address, CustomerProfile, Order};
use crate::routes::paths;
use crate::services::auth::AuthService;
use crate::services::session_store::SessionStore;

/// An order with the address it ships to, for the order history.
#[derive(Clone)]
pub struct OrderRow {
    pub order: Order,
    pub address: Option<Address>,
}

/// Personal info page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub visitor: Visitor,
    pub profile: CustomerProfile,
    pub default_address: Option<Address>,
}

/// Address book template.
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses.html")]
pub struct AddressesTemplate {
    pub visitor: Visitor,
    pub addresses: Vec<Address>,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub visitor: Visitor,
    pub orders: Vec<OrderRow>,
}

/// Actions offered on an order. None of them reach the backend yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderAction {
    Cancel,
    Review,
    BuyAgain,
}

impl OrderAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Review => "review",
            Self::BuyAgain => "buy-again",
        }
    }

    /// Whether the order's state offers this action.
    #[must_use]
    pub const fn allowed_for(self, order: &Order) -> bool {
        match self {
            Self::Cancel => order.can_cancel(),
            Self::Review => order.can_review(),
            Self::BuyAgain => order.can_buy_again(),
        }
    }
}

/// The stored profile, or one built from the stored user when the login
/// carried none.
async fn load_profile<S: SessionStore>(auth: &AuthService<S>, visitor: &Visitor) -> CustomerProfile {
    if let Some(profile) = auth.customer_profile().await {
        return profile;
    }
    visitor
        .user
        .as_ref()
        .map(|user| CustomerProfile {
            name: user.display_name().to_string(),
            email: user.email.clone(),
            ..CustomerProfile::default()
        })
        .unwrap_or_default()
}

/// Display personal info.
pub async fn index(SessionAuth(auth): SessionAuth, visitor: Visitor) -> impl IntoResponse {
    let profile = load_profile(&auth, &visitor).await;
    let default_address = profile.default_address().cloned();

    AccountIndexTemplate {
        visitor,
        profile,
        default_address,
    }
}

/// Display the address book.
pub async fn addresses(SessionAuth(auth): SessionAuth, visitor: Visitor) -> impl IntoResponse {
    let profile = load_profile(&auth, &visitor).await;

    AddressesTemplate {
        visitor,
        addresses: profile.addresses,
    }
}

/// Display the order history, newest first.
pub async fn orders(SessionAuth(auth): SessionAuth, visitor: Visitor) -> impl IntoResponse {
    let profile = load_profile(&auth, &visitor).await;

    let mut orders: Vec<OrderRow> = profile
        .orders
        .iter()
        .map(|order| OrderRow {
            order: order.clone(),
            address: profile.shipping_address(order).cloned(),
        })
        .collect();
    orders.sort_by(|a, b| b.order.date.cmp(&a.order.date));

    OrdersTemplate { visitor, orders }
}

/// Record an order action and return to the order history.
pub async fn order_action(
    SessionAuth(auth): SessionAuth,
    Path((order_id, action)): Path<(OrderId, OrderAction)>,
) -> Redirect {
    let order = auth
        .customer_profile()
        .await
        .and_then(|profile| profile.orders.into_iter().find(|order| order.id == order_id));

    match order {
        Some(order) if action.allowed_for(&order) => {
            tracing::info!(
                order_id = %order_id,
                action = action.as_str(),
                "Order action requested"
            );
            add_breadcrumb(
                "order",
                "Order action requested",
                Some(&[
                    ("order_id", order_id.to_string().as_str()),
                    ("action", action.as_str()),
                ]),
            );
        }
        Some(order) => {
            tracing::warn!(
                order_id = %order_id,
                action = action.as_str(),
                status = %order.status,
                "Order action not available for this order"
            );
        }
        None => {
            tracing::warn!(order_id = %order_id, action = action.as_str(), "Unknown order");
        }
    }

    Redirect::to(paths::ACCOUNT_ORDERS)
}
