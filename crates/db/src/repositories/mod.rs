//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod offline_status_repo;

pub use offline_status_repo::OfflineStatusRepo;
