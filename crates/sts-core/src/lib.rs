//! sts-core
//!
//! Domain types shared by the Smart Token Share ledger: the token share
//! record, crowdfund stages, their stored byte format, the error enum and
//! the host collaborator traits (witness check, block clock, event sink).

pub mod constants;
pub mod error;
pub mod host;
pub mod record;
pub mod stage;
pub mod types;

pub use constants::*;
pub use error::{StsError, StsResult};
pub use host::{BlockClock, EventSink, LedgerEvent, WitnessCheck};
pub use record::{decode_share, encode_share, TokenShareRecord};
pub use stage::{decode_stages, encode_stages, CrowdfundStage, StagePhase};
pub use types::*;
