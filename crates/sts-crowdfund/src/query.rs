use sts_core::error::StsResult;
use sts_core::stage::StagePhase;
use sts_core::types::{BlockHeight, ProjectId};
use sts_state::LedgerStore;

use crate::controller::StageController;

/// Read-only helpers over a project's funding rounds.
pub struct StageQuery<'a, S: LedgerStore> {
    controller: &'a StageController<S>,
}

impl<'a, S: LedgerStore> StageQuery<'a, S> {
    pub fn new(controller: &'a StageController<S>) -> Self {
        Self { controller }
    }

    /// Phase of the round that matters at `height`: the open one if any,
    /// otherwise the next pending one, otherwise `Closed`. `None` when the
    /// project has no rounds.
    pub fn phase(&self, project_id: &ProjectId, height: BlockHeight) -> StsResult<Option<StagePhase>> {
        let phases: Vec<StagePhase> = self
            .controller
            .stages(project_id)?
            .iter()
            .map(|s| s.phase(height))
            .collect();
        if phases.is_empty() {
            return Ok(None);
        }
        let phase = [StagePhase::Open, StagePhase::Pending]
            .into_iter()
            .find(|p| phases.contains(p))
            .unwrap_or(StagePhase::Closed);
        Ok(Some(phase))
    }

    /// Human-readable summary of the project's supply and every round.
    pub fn describe(&self, project_id: &ProjectId, height: BlockHeight) -> StsResult<String> {
        let record = self.controller.shares().get(project_id)?;
        let mut out = format!(
            "{} ({}) | {}/{} issued | owner: {}",
            record.project_id,
            record.symbol,
            record.in_circulation,
            record.total_supply,
            record.owner
        );

        for (i, stage) in self.controller.stages(project_id)?.iter().enumerate() {
            let status = match stage.phase(height) {
                StagePhase::Pending => {
                    format!("Pending — opens in {} blocks", stage.start_height - height)
                }
                StagePhase::Open => {
                    let remaining = (stage.end_height - height).saturating_add(1);
                    format!("Open — closes in {} blocks", remaining)
                }
                StagePhase::Closed => format!("Closed after block {}", stage.end_height),
            };
            out.push_str(&format!(
                "\n  stage {} | blocks {}..={} | rate {} | allotment {} | {}",
                i + 1,
                stage.start_height,
                stage.end_height,
                stage.rate,
                stage.allotment,
                status
            ));
        }
        Ok(out)
    }
}
