pub mod dashboard;
pub mod feeds;
pub mod offline;
