//! HTTP handler functions, one module per resource.

pub mod auth;
pub mod countries;
pub mod scores;
pub mod users;
