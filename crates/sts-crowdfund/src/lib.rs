//! sts-crowdfund
//!
//! Block-height gated funding rounds on top of the token share ledger.
//! The circulation accounting lives in sts-state's TokenShareManager; this
//! crate decides when a contribution may mint and how much.

pub mod config;
pub mod controller;
pub mod query;

pub use config::CrowdfundConfig;
pub use controller::StageController;
pub use query::StageQuery;
