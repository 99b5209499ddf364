use maple_token_platform::{BalanceError, ObjectId, PlatformError};
use thiserror::Error;

/// Errors from treasury lock operations.
///
/// Every variant aborts only the call that produced it; no state has been
/// written by the time it is returned.
#[derive(Error, Debug)]
pub enum TreasuryError {
    /// The presented mint cap's id is on the lock's ban list.
    #[error("mint capability {cap_id} is banned")]
    CapabilityBanned { cap_id: ObjectId },

    /// The mint would push the cap past its per-epoch allowance.
    #[error(
        "quota exceeded for mint capability {cap_id}: {minted} already minted this epoch, {requested} requested, limit {max}"
    )]
    QuotaExceeded {
        cap_id: ObjectId,
        requested: u64,
        minted: u64,
        max: u64,
    },

    /// Supply arithmetic failed in the wrapped supply capability.
    #[error("supply error: {0}")]
    Supply(#[from] BalanceError),

    /// The host platform failed (shared object or object store).
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl TreasuryError {
    /// Whether retrying later (new epoch, unban) could succeed without
    /// changing the request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TreasuryError::CapabilityBanned { .. } | TreasuryError::QuotaExceeded { .. }
        )
    }
}
