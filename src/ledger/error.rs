use thiserror::Error;

/// Failures surfaced by fallible ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Tampering is restricted to minted blocks; genesis (index 0) is
    /// deliberately covered by the same range check.
    #[error("block index {index} is out of range for tampering (chain length {len})")]
    OutOfRange { index: usize, len: usize },

    /// Bounded mining ran out of attempts before a satisfying nonce was found.
    #[error("mining budget exhausted after {attempts} attempts on block {index}")]
    BudgetExhausted { index: u64, attempts: u64 },
}

/// Negative outcome of chain validation. This is data, not a fault: a chain
/// with a broken invariant is an expected state the caller inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("block {index}: previous digest does not match the preceding block")]
    PreviousDigestMismatch { index: u64 },

    #[error("block {index}: digest mismatch against recomputed contents")]
    DigestMismatch { index: u64 },

    #[error("block {index}: digest does not meet difficulty {difficulty}")]
    InsufficientDifficulty { index: u64, difficulty: u32 },
}
