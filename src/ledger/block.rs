use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{GENESIS_DATA, GENESIS_PREVIOUS_DIGEST};

/// A single block in the ledger. `digest` is a cached value set at
/// construction and during mining; it is never recomputed implicitly, so
/// direct field mutation (tampering) leaves it stale on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // Unix seconds (UTC), fractional
    pub data: Value,
    pub previous_digest: String,
    pub nonce: u64, // Proof-of-Work nonce
    pub digest: String,
}

/// Display form of a block: same fields, timestamp rendered as ISO-8601 UTC.
/// Intended for dumps and logging, not a durable format.
#[derive(Debug, Clone, Serialize)]
pub struct BlockRecord {
    pub index: u64,
    pub timestamp: String,
    pub data: Value,
    pub previous_digest: String,
    pub nonce: u64,
    pub digest: String,
}

impl Block {
    /// Create the genesis block (first block in the chain, no predecessor).
    pub fn genesis() -> Self {
        Self::new(
            0,
            unix_seconds_now(),
            Value::from(GENESIS_DATA),
            GENESIS_PREVIOUS_DIGEST.to_string(),
        )
    }

    /// Create a new block with nonce 0 (not mined yet). The initial digest
    /// reflects nonce 0 and will generally not satisfy any difficulty target.
    pub fn new(index: u64, timestamp: f64, data: Value, previous_digest: String) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data,
            previous_digest,
            nonce: 0,
            digest: String::new(),
        };
        block.digest = block.compute_digest();
        block
    }

    /// Compute the SHA-256 digest of this block from its fields (excluding
    /// the `digest` field itself). The preimage is compact JSON with sorted
    /// keys, so the same logical content always hashes to the same value.
    pub fn compute_digest(&self) -> String {
        let preimage = serde_json::json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "data": self.data,
            "previous_digest": self.previous_digest,
            "nonce": self.nonce,
        });
        let mut hasher = Sha256::new();
        hasher.update(preimage.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Render the display record for this block. Pure, no mutation.
    pub fn record(&self) -> BlockRecord {
        BlockRecord {
            index: self.index,
            timestamp: iso8601_utc(self.timestamp),
            data: self.data.clone(),
            previous_digest: self.previous_digest.clone(),
            nonce: self.nonce,
            digest: self.digest.clone(),
        }
    }
}

/// Current wall-clock time as fractional Unix seconds.
pub(crate) fn unix_seconds_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// ISO-8601 UTC rendering of a fractional Unix timestamp, `Z`-suffixed.
/// Timestamps outside chrono's representable range fall back to the raw
/// number.
fn iso8601_utc(timestamp: f64) -> String {
    let secs = timestamp.floor() as i64;
    let nanos = (((timestamp - secs as f64) * 1e9).round() as u32).min(999_999_999);
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
        .unwrap_or_else(|| format!("{timestamp}"))
}

#[cfg(test)]
mod tests {
    use super::Block;
    use serde_json::json;

    #[test]
    fn genesis_has_valid_digest() {
        let b = Block::genesis();
        assert_eq!(b.digest, b.compute_digest());
        assert!(!b.digest.is_empty());
        assert_eq!(b.index, 0);
        assert_eq!(b.previous_digest, "0");
    }

    #[test]
    fn digest_is_deterministic() {
        let a = Block::new(3, 1_700_000_000.25, json!({"amount": 42}), "abc".into());
        let b = Block::new(3, 1_700_000_000.25, json!({"amount": 42}), "abc".into());
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.compute_digest(), b.compute_digest());
    }

    #[test]
    fn digest_depends_on_nonce() {
        let mut b = Block::new(1, 1.0, json!("payload"), "prev".into());
        let before = b.compute_digest();
        b.nonce += 1;
        assert_ne!(before, b.compute_digest());
    }

    #[test]
    fn stored_digest_diverges_after_direct_mutation() {
        let mut b = Block::new(1, 1.0, json!("original"), "prev".into());
        b.data = json!("mutated");

        // The cached digest stays stale; only an explicit recompute sees the
        // new contents.
        assert_ne!(b.digest, b.compute_digest());
    }

    #[test]
    fn record_renders_epoch_timestamp() {
        let b = Block::new(0, 0.0, json!("x"), "0".into());
        let rec = b.record();
        assert_eq!(rec.timestamp, "1970-01-01T00:00:00.000000Z");
        assert_eq!(rec.digest, b.digest);
        assert_eq!(rec.nonce, 0);
    }

    #[test]
    fn record_timestamp_keeps_fractional_seconds() {
        let b = Block::new(1, 1_700_000_000.5, json!("x"), "0".into());
        assert_eq!(b.record().timestamp, "2023-11-14T22:13:20.500000Z");
    }
}
