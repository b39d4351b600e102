//! Domain models for the storefront.
//!
//! - [`product`] - render-ready product and selector state
//! - [`account`] - addresses, orders and the customer profile
//! - [`session`] - what the session store holds

pub mod account;
pub mod product;
pub mod session;

pub use account::{Address, CustomerProfile, LineItem, Order};
pub use product::{ProductOption, ProductView, Selection};
pub use session::{SessionUser, keys as session_keys};
