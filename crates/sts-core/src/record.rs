use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_DECIMALS;
use crate::error::{StsError, StsResult};
use crate::types::{Amount, Identity, ProjectId};

/// The ledger's view of one project's token: fixed parameters plus the
/// cumulative circulation counter.
///
/// `total_supply` never changes after creation; `in_circulation` only grows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenShareRecord {
    pub project_id: ProjectId,
    pub symbol: String,
    pub decimals: u8,
    pub owner: Identity,
    pub total_supply: Amount,
    pub in_circulation: Amount,
}

impl TokenShareRecord {
    /// Fresh record with nothing issued yet.
    pub fn new(
        project_id: ProjectId,
        symbol: impl Into<String>,
        decimals: u8,
        owner: Identity,
        total_supply: Amount,
    ) -> StsResult<Self> {
        if decimals > MAX_DECIMALS {
            return Err(StsError::InvalidDecimals { max: MAX_DECIMALS, got: decimals });
        }
        Ok(Self {
            project_id,
            symbol: symbol.into(),
            decimals,
            owner,
            total_supply,
            in_circulation: 0,
        })
    }

    /// Units that can still be issued.
    ///
    /// A stored circulation above the supply cap is reported as
    /// `CorruptState`, never clamped.
    pub fn available_supply(&self) -> StsResult<Amount> {
        self.total_supply
            .checked_sub(self.in_circulation)
            .ok_or_else(|| {
                StsError::CorruptState(format!(
                    "{}: in_circulation {} exceeds total_supply {}",
                    self.project_id, self.in_circulation, self.total_supply
                ))
            })
    }

    pub fn total_circulation(&self) -> Amount {
        self.in_circulation
    }

    /// One whole token expressed in base units (`10^decimals`).
    pub fn unit_scale(&self) -> Amount {
        10u128.pow(self.decimals as u32)
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────
//
// Value layout: bincode (fixed-width little-endian ints, no trailing bytes) of
// the ordered tuple (symbol, decimals, owner, total_supply, in_circulation).
// The project id is the storage key and is not repeated in the value.

type ShareTuple = (String, u8, Identity, Amount, Amount);

pub(crate) fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Serialize a record into its stored byte form.
pub fn encode_share(record: &TokenShareRecord) -> StsResult<Vec<u8>> {
    wire_options()
        .serialize(&(
            &record.symbol,
            record.decimals,
            &record.owner,
            record.total_supply,
            record.in_circulation,
        ))
        .map_err(|e| StsError::Serialization(e.to_string()))
}

/// Rebuild a record from the bytes stored under `project_id`.
pub fn decode_share(project_id: &ProjectId, bytes: &[u8]) -> StsResult<TokenShareRecord> {
    let (symbol, decimals, owner, total_supply, in_circulation): ShareTuple = wire_options()
        .deserialize(bytes)
        .map_err(|e| StsError::CorruptState(format!("{project_id}: {e}")))?;
    if decimals > MAX_DECIMALS {
        return Err(StsError::CorruptState(format!(
            "{project_id}: decimals {decimals} above {MAX_DECIMALS}"
        )));
    }
    Ok(TokenShareRecord {
        project_id: project_id.clone(),
        symbol,
        decimals,
        owner,
        total_supply,
        in_circulation,
    })
}
