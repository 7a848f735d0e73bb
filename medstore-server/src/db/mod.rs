//! Database access layer

pub mod admin_users;
pub mod analytics;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;
