//! HTTP API handlers for ceazy-web

pub mod albums;
pub mod checkout;
pub mod health;

pub use albums::{get_album, list_albums};
pub use checkout::{create_payment_intent, purchase_album};
pub use health::health_routes;
