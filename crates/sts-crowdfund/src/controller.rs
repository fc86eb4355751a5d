use std::sync::Arc;

use sts_core::constants::STAGE_NAMESPACE;
use sts_core::error::{StsError, StsResult};
use sts_core::host::{emit, BlockClock, LedgerEvent};
use sts_core::record::TokenShareRecord;
use sts_core::stage::{decode_stages, encode_stages, CrowdfundStage};
use sts_core::types::{Amount, BlockHeight, ProjectId};
use sts_state::{LedgerStore, TokenShareManager};
use tracing::{debug, info, warn};

use crate::config::CrowdfundConfig;

/// Opens funding rounds and turns contributions into issued tokens.
///
/// Stages are stored per project as an append-only list of non-overlapping
/// windows. Whether a stage accepts contributions is decided from the
/// height passed in, never from stored state.
pub struct StageController<S: LedgerStore> {
    shares: TokenShareManager<S>,
    clock: Arc<dyn BlockClock>,
}

impl<S: LedgerStore> StageController<S> {
    pub fn new(shares: TokenShareManager<S>, clock: Arc<dyn BlockClock>) -> Self {
        Self { shares, clock }
    }

    pub fn shares(&self) -> &TokenShareManager<S> {
        &self.shares
    }

    pub fn current_height(&self) -> BlockHeight {
        self.clock.current_block_height()
    }

    // ── Stage creation ───────────────────────────────────────────────────────

    /// Register a new funding round for an existing project.
    ///
    /// `total_supply` is the advertised allotment for this round and must fit
    /// in the project's remaining supply when the round opens. Returns `true`
    /// once the stage is stored.
    pub fn start_new_crowdfund(
        &self,
        project_id: &ProjectId,
        start_height: BlockHeight,
        end_height: BlockHeight,
        total_supply: Amount,
        rate: Amount,
    ) -> StsResult<bool> {
        let record = self.project(project_id)?;
        if !self.shares.is_witnessed(&record.owner) {
            warn!(project = %project_id, "crowdfund rejected: missing owner witness");
            return Err(StsError::Unauthorized);
        }
        if start_height > end_height {
            return Err(StsError::InvalidWindow { start: start_height, end: end_height });
        }
        if rate == 0 {
            return Err(StsError::InvalidRate);
        }
        if total_supply == 0 {
            return Err(StsError::InvalidAmount);
        }
        let available = self.shares.available_supply(&record)?;
        if total_supply > available {
            return Err(StsError::SupplyExceeded { requested: total_supply, available });
        }

        let stage = CrowdfundStage {
            project_id: project_id.clone(),
            start_height,
            end_height,
            allotment: total_supply,
            rate,
        };
        let key = project_id.as_bytes();
        self.shares.locks().with_key(STAGE_NAMESPACE, key, || -> StsResult<()> {
            let mut stages = self.stages(project_id)?;
            if stages.iter().any(|s| s.overlaps(start_height, end_height)) {
                return Err(StsError::StageOverlap { start: start_height, end: end_height });
            }
            stages.push(stage);
            stages.sort_by_key(|s| s.start_height);
            let bytes = encode_stages(&stages)?;
            self.shares.store().put(STAGE_NAMESPACE, key, &bytes)
        })?;

        info!(
            project = %project_id,
            start_height,
            end_height,
            allotment = total_supply,
            rate,
            "crowdfund stage started"
        );
        emit(
            self.shares.events(),
            LedgerEvent::CrowdfundStarted {
                project_id: project_id.clone(),
                start_height,
                end_height,
                rate,
            },
        );
        Ok(true)
    }

    /// Open a round from `config`, scaling its per-unit token count by the
    /// project's decimals.
    pub fn start_from_config(
        &self,
        project_id: &ProjectId,
        config: &CrowdfundConfig,
    ) -> StsResult<bool> {
        let record = self.project(project_id)?;
        let rate = config.rate_for(record.decimals)?;
        self.start_new_crowdfund(
            project_id,
            config.start_height,
            config.end_height,
            config.allotment,
            rate,
        )
    }

    // ── Contributions ────────────────────────────────────────────────────────

    pub fn is_contribution_window_open(
        &self,
        stage: &CrowdfundStage,
        current_height: BlockHeight,
    ) -> bool {
        stage.is_open(current_height)
    }

    /// Mint `contributed_amount * rate` units for a contribution made at
    /// `current_height`. Returns the minted amount.
    ///
    /// Minting goes through `add_to_circulation`, so the call must carry the
    /// project owner's witness.
    pub fn contribute(
        &self,
        stage: &CrowdfundStage,
        current_height: BlockHeight,
        contributed_amount: Amount,
    ) -> StsResult<Amount> {
        if !self.is_contribution_window_open(stage, current_height) {
            debug!(
                project = %stage.project_id,
                height = current_height,
                phase = ?stage.phase(current_height),
                "contribution outside window"
            );
            return Err(StsError::WindowClosed {
                height: current_height,
                start: stage.start_height,
                end: stage.end_height,
            });
        }
        if contributed_amount == 0 {
            return Err(StsError::InvalidAmount);
        }
        // Only stages the owner registered may mint.
        if !self.stages(&stage.project_id)?.contains(stage) {
            return Err(StsError::UnknownStage {
                project: stage.project_id.to_string(),
                start: stage.start_height,
                end: stage.end_height,
            });
        }

        let minted = match contributed_amount.checked_mul(stage.rate) {
            Some(m) => m,
            None => {
                let available = self.shares.get(&stage.project_id)?.available_supply()?;
                return Err(StsError::SupplyExceeded { requested: Amount::MAX, available });
            }
        };
        self.shares.add_to_circulation(&stage.project_id, minted)?;
        info!(
            project = %stage.project_id,
            height = current_height,
            contributed = contributed_amount,
            minted,
            "contribution accepted"
        );
        Ok(minted)
    }

    /// `contribute` at the clock's current height.
    pub fn contribute_now(
        &self,
        stage: &CrowdfundStage,
        contributed_amount: Amount,
    ) -> StsResult<Amount> {
        self.contribute(stage, self.current_height(), contributed_amount)
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Every stage registered for `project_id`, ordered by start height.
    pub fn stages(&self, project_id: &ProjectId) -> StsResult<Vec<CrowdfundStage>> {
        match self.shares.store().get(STAGE_NAMESPACE, project_id.as_bytes())? {
            Some(bytes) => decode_stages(project_id, &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// The stage accepting contributions at `height`, if any.
    pub fn active_stage(
        &self,
        project_id: &ProjectId,
        height: BlockHeight,
    ) -> StsResult<Option<CrowdfundStage>> {
        Ok(self
            .stages(project_id)?
            .into_iter()
            .find(|s| s.is_open(height)))
    }

    fn project(&self, project_id: &ProjectId) -> StsResult<TokenShareRecord> {
        self.shares.get(project_id).map_err(|e| match e {
            StsError::NotFound(id) => StsError::UnknownProject(id),
            other => other,
        })
    }
}
