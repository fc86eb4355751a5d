use thiserror::Error;

use crate::types::{Amount, BlockHeight};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StsError {
    // ── Record errors ────────────────────────────────────────────────────────
    #[error("token share record not found: {0}")]
    NotFound(String),

    #[error("project id must not be empty")]
    InvalidProjectId,

    #[error("decimals out of range: maximum {max}, got {got}")]
    InvalidDecimals { max: u8, got: u8 },

    // ── Issuance errors ──────────────────────────────────────────────────────
    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("supply exceeded: requested {requested} units, {available} available")]
    SupplyExceeded { requested: Amount, available: Amount },

    // ── Crowdfund errors ─────────────────────────────────────────────────────
    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("invalid contribution window: start {start} is after end {end}")]
    InvalidWindow { start: BlockHeight, end: BlockHeight },

    #[error("rate must be greater than zero")]
    InvalidRate,

    #[error("contribution window closed at height {height} (open {start}..={end})")]
    WindowClosed {
        height: BlockHeight,
        start: BlockHeight,
        end: BlockHeight,
    },

    #[error("no crowdfund stage {start}..={end} is registered for {project}")]
    UnknownStage {
        project: String,
        start: BlockHeight,
        end: BlockHeight,
    },

    #[error("window {start}..={end} overlaps an existing crowdfund stage")]
    StageOverlap { start: BlockHeight, end: BlockHeight },

    // ── Auth errors ──────────────────────────────────────────────────────────
    #[error("caller is not authorized for this project")]
    Unauthorized,

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("corrupt ledger state: {0}")]
    CorruptState(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("event sink unavailable: {0}")]
    EventSink(String),
}

pub type StsResult<T> = Result<T, StsError>;
