// src/core/mod.rs
//! Configuration, persistence and file system services

pub mod config_manager;
pub mod database;
pub mod fs_ops;

pub use config_manager::{ConfigManager, StoreSettings};
pub use database::{Database, SavedFieldRepository};
pub use fs_ops::FsOps;
