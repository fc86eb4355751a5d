//! Collaborators supplied by the host chain.
//!
//! The ledger never verifies signatures, tracks block time or publishes
//! notifications itself; it asks these traits. The small implementations
//! below back tests and single-process embeddings.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{StsError, StsResult};
use crate::types::{Amount, BlockHeight, Identity, ProjectId};

/// Answers whether the current call was signed by `identity`.
pub trait WitnessCheck: Send + Sync {
    fn check_witness(&self, identity: &Identity) -> bool;
}

/// Monotonically non-decreasing block height source.
pub trait BlockClock: Send + Sync {
    fn current_block_height(&self) -> BlockHeight;
}

/// Fire-and-forget notification channel. Errors are logged by the caller
/// and never fail the operation that produced the event.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: &LedgerEvent) -> StsResult<()>;
}

// ── Events ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Created {
        project_id: ProjectId,
        symbol: String,
        total_supply: Amount,
    },
    Minted {
        project_id: ProjectId,
        amount: Amount,
        in_circulation: Amount,
    },
    CrowdfundStarted {
        project_id: ProjectId,
        start_height: BlockHeight,
        end_height: BlockHeight,
        rate: Amount,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Created { .. } => "Created",
            LedgerEvent::Minted { .. } => "Minted",
            LedgerEvent::CrowdfundStarted { .. } => "CrowdfundStarted",
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        match self {
            LedgerEvent::Created { project_id, .. }
            | LedgerEvent::Minted { project_id, .. }
            | LedgerEvent::CrowdfundStarted { project_id, .. } => project_id,
        }
    }
}

/// Deliver `event`, downgrading sink failures to a warning.
pub fn emit(sink: &dyn EventSink, event: LedgerEvent) {
    if let Err(e) = sink.notify(&event) {
        tracing::warn!(
            event = event.name(),
            project = %event.project_id(),
            error = %e,
            "event sink failed; continuing"
        );
    }
}

// ── Witnesses ────────────────────────────────────────────────────────────────

/// The identities that signed the call currently being executed.
#[derive(Default)]
pub struct Witnesses {
    signers: RwLock<HashSet<Identity>>,
    allow_all: bool,
}

impl Witnesses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts every identity. For trusted single-operator deployments.
    pub fn allow_all() -> Self {
        Self { signers: RwLock::default(), allow_all: true }
    }

    pub fn signed_by(identities: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            signers: RwLock::new(identities.into_iter().collect()),
            allow_all: false,
        }
    }

    pub fn add(&self, identity: Identity) {
        if let Ok(mut s) = self.signers.write() {
            s.insert(identity);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut s) = self.signers.write() {
            s.clear();
        }
    }
}

impl WitnessCheck for Witnesses {
    fn check_witness(&self, identity: &Identity) -> bool {
        self.allow_all
            || self
                .signers
                .read()
                .map(|s| s.contains(identity))
                .unwrap_or(false)
    }
}

// ── Clock ────────────────────────────────────────────────────────────────────

/// Manually driven clock. Height only ever moves forward.
#[derive(Default)]
pub struct FixedClock {
    height: AtomicU64,
}

impl FixedClock {
    pub fn at(height: BlockHeight) -> Self {
        Self { height: AtomicU64::new(height) }
    }

    /// Move to `height`; earlier heights are ignored.
    pub fn advance_to(&self, height: BlockHeight) {
        self.height.fetch_max(height, Ordering::SeqCst);
    }
}

impl BlockClock for FixedClock {
    fn current_block_height(&self) -> BlockHeight {
        self.height.load(Ordering::SeqCst)
    }
}

// ── Sinks ────────────────────────────────────────────────────────────────────

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&self, _event: &LedgerEvent) -> StsResult<()> {
        Ok(())
    }
}

/// Keeps events in memory; can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LedgerEvent>>,
    unavailable: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(LedgerEvent::name).collect()
    }
}

impl EventSink for RecordingSink {
    fn notify(&self, event: &LedgerEvent) -> StsResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StsError::EventSink("recording sink offline".into()));
        }
        self.events
            .lock()
            .map_err(|e| StsError::EventSink(e.to_string()))?
            .push(event.clone());
        Ok(())
    }
}
