use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::{StsError, StsResult};
use crate::record::wire_options;
use crate::types::{Amount, BlockHeight, ProjectId};

/// Where a stage sits relative to the current block height.
///
/// Never stored: always recomputed from the height and the stage bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePhase {
    /// `height < start_height`.
    Pending,
    /// `start_height <= height <= end_height`.
    Open,
    /// `height > end_height`.
    Closed,
}

/// A block-height window during which contributions mint tokens at `rate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdfundStage {
    pub project_id: ProjectId,
    /// First height (inclusive) at which contributions are accepted.
    pub start_height: BlockHeight,
    /// Last height (inclusive) at which contributions are accepted.
    pub end_height: BlockHeight,
    /// Units advertised for this round when it was opened. Informational:
    /// contributions do not draw it down, and the record's `total_supply`
    /// is the only issuance cap.
    pub allotment: Amount,
    /// Minted base units per contributed unit.
    pub rate: Amount,
}

impl CrowdfundStage {
    pub fn phase(&self, height: BlockHeight) -> StagePhase {
        if height < self.start_height {
            StagePhase::Pending
        } else if height <= self.end_height {
            StagePhase::Open
        } else {
            StagePhase::Closed
        }
    }

    pub fn is_open(&self, height: BlockHeight) -> bool {
        self.phase(height) == StagePhase::Open
    }

    /// True if the two inclusive windows share at least one height.
    pub fn overlaps(&self, start: BlockHeight, end: BlockHeight) -> bool {
        self.start_height <= end && start <= self.end_height
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

type StageTuple = (BlockHeight, BlockHeight, Amount, Amount);

/// Serialize every stage of one project as an ordered list of
/// (start_height, end_height, allotment, rate) tuples.
pub fn encode_stages(stages: &[CrowdfundStage]) -> StsResult<Vec<u8>> {
    let tuples: Vec<StageTuple> = stages
        .iter()
        .map(|s| (s.start_height, s.end_height, s.allotment, s.rate))
        .collect();
    wire_options()
        .serialize(&tuples)
        .map_err(|e| StsError::Serialization(e.to_string()))
}

pub fn decode_stages(project_id: &ProjectId, bytes: &[u8]) -> StsResult<Vec<CrowdfundStage>> {
    let tuples: Vec<StageTuple> = wire_options()
        .deserialize(bytes)
        .map_err(|e| StsError::CorruptState(format!("{project_id} stages: {e}")))?;
    tuples
        .into_iter()
        .map(|(start_height, end_height, allotment, rate)| {
            if start_height > end_height {
                return Err(StsError::CorruptState(format!(
                    "{project_id} stage window {start_height}..={end_height} is inverted"
                )));
            }
            Ok(CrowdfundStage {
                project_id: project_id.clone(),
                start_height,
                end_height,
                allotment,
                rate,
            })
        })
        .collect()
}
