//! Shared foundation for the medstore storefront services
//!
//! Holds the pieces every layer agrees on: the unified error system
//! ([`error`]) and the domain enums ([`types`]) that travel between the
//! database layer and the API surface.

pub mod error;
pub mod types;
