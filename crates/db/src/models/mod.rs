//! Database row types.

pub mod offline_status;
