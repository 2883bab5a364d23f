//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod country_repo;
pub mod score_repo;
pub mod session_repo;
pub mod user_repo;

pub use country_repo::CountryRepo;
pub use score_repo::{ScoreFilter, ScoreRepo};
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
