pub mod api;
pub mod cameras;
pub mod config;
pub mod humanize;
pub mod observability;
pub mod snapshot;
pub mod storage;
