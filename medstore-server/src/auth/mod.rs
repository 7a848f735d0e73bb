//! Authentication for the admin API

pub mod admin_auth;
