use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StsError, StsResult};

/// Token quantity in base units (scaled by the project's decimals).
pub type Amount = u128;

/// Block height reported by the host chain.
pub type BlockHeight = u64;

// ── ProjectId ────────────────────────────────────────────────────────────────

/// Unique, non-empty identifier of a token-issuance project.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> StsResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(StsError::InvalidProjectId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key bytes for this project.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for ProjectId {
    type Error = StsError;

    fn try_from(id: String) -> StsResult<Self> {
        Self::new(id)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

// ── Identity ─────────────────────────────────────────────────────────────────

/// 32-byte opaque identity, derived as BLAKE3(public_key).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    /// Hash a raw public key into the identity the ledger stores as `owner`.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self(*blake3::hash(public_key).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base-58 encoded string representation.
    pub fn to_b58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    pub fn from_b58(s: &str) -> StsResult<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| StsError::Serialization(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StsError::Serialization("identity must be 32 bytes".into()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_b58())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", &self.to_b58()[..8])
    }
}
