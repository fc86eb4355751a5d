/// ─── Smart Token Share Ledger Constants ─────────────────────────────────────
///
/// Storage namespaces and record limits shared by every crate in the workspace.

// ── Storage namespaces ───────────────────────────────────────────────────────

/// Namespace holding one token share record per project id.
pub const SHARE_NAMESPACE: &str = "STS";

/// Namespace holding the list of crowdfund stages per project id.
pub const STAGE_NAMESPACE: &str = "STG";

// ── Record limits ────────────────────────────────────────────────────────────

/// Largest fixed-point scale a token share may declare.
pub const MAX_DECIMALS: u8 = 18;

/// Scale used when a project does not ask for anything else.
pub const DEFAULT_DECIMALS: u8 = 8;
