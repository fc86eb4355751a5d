use std::sync::Arc;

use sts_core::constants::SHARE_NAMESPACE;
use sts_core::error::{StsError, StsResult};
use sts_core::host::{emit, EventSink, LedgerEvent, WitnessCheck};
use sts_core::record::{decode_share, encode_share, TokenShareRecord};
use sts_core::types::{Amount, Identity, ProjectId};
use tracing::{debug, info, warn};

use crate::lock::KeyLocks;
use crate::store::LedgerStore;

/// Owns the token share records of every project in a `LedgerStore`.
///
/// Every mutating call is one critical section per project key: read the
/// record, compute, then write it back with a single `put`. A call that
/// fails leaves the store untouched.
pub struct TokenShareManager<S: LedgerStore> {
    store: Arc<S>,
    witness: Arc<dyn WitnessCheck>,
    events: Arc<dyn EventSink>,
    locks: Arc<KeyLocks>,
}

impl<S: LedgerStore> Clone for TokenShareManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            witness: Arc::clone(&self.witness),
            events: Arc::clone(&self.events),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<S: LedgerStore> TokenShareManager<S> {
    pub fn new(store: Arc<S>, witness: Arc<dyn WitnessCheck>, events: Arc<dyn EventSink>) -> Self {
        Self { store, witness, events, locks: Arc::new(KeyLocks::new()) }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn events(&self) -> &dyn EventSink {
        &*self.events
    }

    /// Per-key lock registry shared with layers that write their own namespaces.
    pub fn locks(&self) -> &KeyLocks {
        &self.locks
    }

    /// True if the current call carries `owner`'s witness.
    pub fn is_witnessed(&self, owner: &Identity) -> bool {
        self.witness.check_witness(owner)
    }

    // ── Create / read ────────────────────────────────────────────────────────

    /// Create the record for `project_id` unless one already exists.
    ///
    /// An existing record is returned as stored; nothing is written and no
    /// event fires.
    pub fn create(
        &self,
        project_id: &ProjectId,
        symbol: &str,
        decimals: u8,
        owner: Identity,
        total_supply: Amount,
    ) -> StsResult<TokenShareRecord> {
        let fresh = TokenShareRecord::new(project_id.clone(), symbol, decimals, owner, total_supply)?;

        let key = project_id.as_bytes();
        let (record, created) =
            self.locks.with_key(SHARE_NAMESPACE, key, || -> StsResult<(TokenShareRecord, bool)> {
                if let Some(existing) = self.load(project_id)? {
                    debug!(project = %project_id, "token share already exists; create is a no-op");
                    return Ok((existing, false));
                }
                self.write(&fresh)?;
                Ok((fresh, true))
            })?;

        if created {
            info!(
                project = %project_id,
                symbol = %record.symbol,
                decimals = record.decimals,
                owner = %record.owner,
                total_supply = record.total_supply,
                "token share created"
            );
            emit(
                self.events(),
                LedgerEvent::Created {
                    project_id: project_id.clone(),
                    symbol: record.symbol.clone(),
                    total_supply: record.total_supply,
                },
            );
        }
        Ok(record)
    }

    pub fn get(&self, project_id: &ProjectId) -> StsResult<TokenShareRecord> {
        self.load(project_id)?
            .ok_or_else(|| StsError::NotFound(project_id.to_string()))
    }

    pub fn exists(&self, project_id: &ProjectId) -> StsResult<bool> {
        self.store.contains(SHARE_NAMESPACE, project_id.as_bytes())
    }

    // ── Projections ──────────────────────────────────────────────────────────

    pub fn available_supply(&self, record: &TokenShareRecord) -> StsResult<Amount> {
        let available = record.available_supply();
        if let Err(e) = &available {
            warn!(project = %record.project_id, error = %e, "token share invariant violated");
        }
        available
    }

    pub fn total_circulation(&self, record: &TokenShareRecord) -> Amount {
        record.total_circulation()
    }

    // ── Issuance ─────────────────────────────────────────────────────────────

    /// Owner-signed mint: raise `in_circulation` by `amount`.
    ///
    /// Fails with `Unauthorized` unless the current call carries the
    /// record owner's witness.
    pub fn add_to_circulation(
        &self,
        project_id: &ProjectId,
        amount: Amount,
    ) -> StsResult<TokenShareRecord> {
        if amount == 0 {
            return Err(StsError::InvalidAmount);
        }

        let key = project_id.as_bytes();
        let record = self.locks.with_key(SHARE_NAMESPACE, key, || -> StsResult<TokenShareRecord> {
            let mut record = self.get(project_id)?;
            if !self.is_witnessed(&record.owner) {
                warn!(project = %project_id, "mint rejected: missing owner witness");
                return Err(StsError::Unauthorized);
            }
            let available = self.available_supply(&record)?;
            if amount > available {
                return Err(StsError::SupplyExceeded { requested: amount, available });
            }
            record.in_circulation += amount;
            self.write(&record)?;
            Ok(record)
        })?;

        info!(
            project = %project_id,
            amount,
            in_circulation = record.in_circulation,
            total_supply = record.total_supply,
            "tokens issued"
        );
        emit(
            self.events(),
            LedgerEvent::Minted {
                project_id: project_id.clone(),
                amount,
                in_circulation: record.in_circulation,
            },
        );
        Ok(record)
    }

    // ── Storage helpers ──────────────────────────────────────────────────────

    fn load(&self, project_id: &ProjectId) -> StsResult<Option<TokenShareRecord>> {
        match self.store.get(SHARE_NAMESPACE, project_id.as_bytes())? {
            Some(bytes) => decode_share(project_id, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn write(&self, record: &TokenShareRecord) -> StsResult<()> {
        let bytes = encode_share(record)?;
        self.store
            .put(SHARE_NAMESPACE, record.project_id.as_bytes(), &bytes)
    }
}
