//! Capitalympics core library.
//!
//! Pure domain logic shared by the db and api crates: the mastery-score
//! calculator, the next-country selector, and the common type aliases and
//! error enum. Nothing in this crate performs I/O.

pub mod error;
pub mod scoring;
pub mod types;
