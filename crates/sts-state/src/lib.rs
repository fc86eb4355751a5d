//! sts-state
//!
//! Persistence for the Smart Token Share ledger: the `LedgerStore` trait
//! with sled-backed and in-memory implementations, store configuration,
//! per-key write serialization, and the `TokenShareManager` that owns
//! create, read and circulation accounting for each project.

pub mod config;
pub mod db;
pub mod lock;
pub mod share;
pub mod store;

pub use config::LedgerConfig;
pub use db::SledStore;
pub use lock::KeyLocks;
pub use share::TokenShareManager;
pub use store::{LedgerStore, MemoryStore};
