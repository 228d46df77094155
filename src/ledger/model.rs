use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use super::Block;
use super::block::unix_seconds_now;
use super::error::{LedgerError, ValidationFailure};

/// In-memory append-only ledger with Proof-of-Work. One writer, one
/// operation at a time; blocks are never removed or reordered except through
/// the explicit [`Chain::tamper`] demonstration hook.
#[derive(Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: u32,
}

/// Bound on the nonce search. `Unbounded` runs until a satisfying nonce is
/// found; `Bounded` caps the number of digests tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningBudget {
    Unbounded,
    Bounded(u64),
}

/// Outcome of a successful nonce search.
#[derive(Debug, Clone)]
pub struct MiningSummary {
    pub digest: String,
    pub nonce: u64,
    pub elapsed: Duration,
}

/// Summary returned by [`Chain::add_block`].
#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary {
    pub index: u64,
    pub digest: String,
    pub nonce: u64,
    pub time_taken_secs: f64,
}

/// `{ok, message}` rendering of a validation pass for display surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub message: String,
}

impl Chain {
    /// Initialize a new chain, mining the genesis block before returning.
    /// The search has no guaranteed upper bound but always terminates
    /// probabilistically; difficulty is fixed for the chain's lifetime.
    pub fn new(difficulty: u32) -> Self {
        let mut chain = Self {
            blocks: Vec::new(),
            difficulty,
        };
        let mut genesis = Block::genesis();
        let mined = chain.mine(&mut genesis);
        debug!(
            "mined genesis block (digest={}, nonce={})",
            mined.digest, mined.nonce
        );
        chain.blocks.push(genesis);
        chain
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds at least the genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Brute-force the nonce until the digest gains the required number of
    /// leading zero hex characters. Deterministic for fixed starting fields.
    pub fn mine(&self, block: &mut Block) -> MiningSummary {
        self.mine_within(block, MiningBudget::Unbounded)
            .expect("unbounded mining cannot exhaust its budget")
    }

    /// Nonce search with an explicit budget. On exhaustion the block is left
    /// at the last attempted nonce with its digest recomputed for it.
    pub fn mine_within(
        &self,
        block: &mut Block,
        budget: MiningBudget,
    ) -> Result<MiningSummary, LedgerError> {
        let target = "0".repeat(self.difficulty as usize);
        let started = Instant::now();
        let mut attempts: u64 = 0;
        loop {
            block.digest = block.compute_digest();
            attempts += 1;
            if block.digest.starts_with(&target) {
                debug!(
                    "found nonce {} for block #{} after {} attempts",
                    block.nonce, block.index, attempts
                );
                return Ok(MiningSummary {
                    digest: block.digest.clone(),
                    nonce: block.nonce,
                    elapsed: started.elapsed(),
                });
            }
            if let MiningBudget::Bounded(max_attempts) = budget {
                if attempts >= max_attempts {
                    return Err(LedgerError::BudgetExhausted {
                        index: block.index,
                        attempts,
                    });
                }
            }
            block.nonce = block.nonce.wrapping_add(1);
        }
    }

    /// Mine and append a new block carrying `data`, linked to the current
    /// tail. The only mutating operation besides `tamper` and construction.
    pub fn add_block(&mut self, data: impl Into<Value>) -> BlockSummary {
        let tail = self.last_block();
        let mut block = Block::new(
            tail.index + 1,
            unix_seconds_now(),
            data.into(),
            tail.digest.clone(),
        );
        let mined = self.mine(&mut block);
        info!(
            "sealed block #{} (digest={}, nonce={})",
            block.index, mined.digest, mined.nonce
        );
        let summary = BlockSummary {
            index: block.index,
            digest: mined.digest,
            nonce: mined.nonce,
            time_taken_secs: mined.elapsed.as_secs_f64(),
        };
        self.blocks.push(block);
        summary
    }

    /// Walk the chain from index 1 checking, per block and in order: linkage
    /// to the predecessor's digest, digest integrity against recomputed
    /// contents, and the difficulty prefix. Stops at the first failure, so
    /// when several blocks are broken only the earliest one is reported.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        let target = "0".repeat(self.difficulty as usize);
        for i in 1..self.blocks.len() {
            let current = &self.blocks[i];
            let previous = &self.blocks[i - 1];

            if current.previous_digest != previous.digest {
                return Err(ValidationFailure::PreviousDigestMismatch {
                    index: current.index,
                });
            }
            if current.compute_digest() != current.digest {
                return Err(ValidationFailure::DigestMismatch {
                    index: current.index,
                });
            }
            if !current.digest.starts_with(&target) {
                return Err(ValidationFailure::InsufficientDifficulty {
                    index: current.index,
                    difficulty: self.difficulty,
                });
            }
        }
        Ok(())
    }

    /// Validation result as an `{ok, message}` record.
    pub fn validation_report(&self) -> ValidationReport {
        match self.validate() {
            Ok(()) => ValidationReport {
                ok: true,
                message: "chain is valid".to_string(),
            },
            Err(failure) => ValidationReport {
                ok: false,
                message: failure.to_string(),
            },
        }
    }

    /// Replace the payload of the block at `index` WITHOUT recomputing its
    /// digest, breaking the integrity invariant so `validate` can detect it.
    /// Genesis and out-of-range indices are rejected; the chain is left
    /// untouched on failure.
    pub fn tamper(&mut self, index: usize, new_data: impl Into<Value>) -> Result<(), LedgerError> {
        if index == 0 || index >= self.blocks.len() {
            return Err(LedgerError::OutOfRange {
                index,
                len: self.blocks.len(),
            });
        }
        warn!("tampering with block #{index}: digest left stale");
        self.blocks[index].data = new_data.into();
        Ok(())
    }

    /// Arithmetic mean of the nonce over all non-genesis blocks; 0.0 for a
    /// genesis-only chain.
    pub fn average_nonce(&self) -> f64 {
        let minted = &self.blocks[1..];
        if minted.is_empty() {
            return 0.0;
        }
        let total: u64 = minted.iter().map(|b| b.nonce).sum();
        total as f64 / minted.len() as f64
    }

    /// Display records for every block, genesis first.
    pub fn records(&self) -> Vec<super::BlockRecord> {
        self.blocks.iter().map(Block::record).collect()
    }
}
