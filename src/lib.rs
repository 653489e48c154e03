//! Comanda
//!
//! Comanda is the ordering core of a restaurant menu app: a menu catalog, a cart of
//! menu items with derived totals, simulated order placement and payment, and the
//! diner's profile, with every user-visible outcome reported as a notice.

pub mod cart;
pub mod catalog;
pub mod notifications;
pub mod orders;
pub mod payment;
pub mod prelude;
pub mod prices;
pub mod profile;
pub mod receipt;
pub mod samples;
pub mod session;
pub mod tags;
