//! In-memory append-only ledger demonstrating proof-of-work chaining and
//! tamper detection.
//!
//! The [`ledger`] module holds the whole engine: [`ledger::Block`] is an
//! immutable-once-mined record and [`ledger::Chain`] owns mining, append,
//! validation and tamper injection. There is no networking, persistence or
//! transaction layer; a single caller drives the chain one operation at a
//! time.

pub mod ledger;

pub use ledger::{
    Block, BlockRecord, BlockSummary, Chain, LedgerError, MiningBudget, MiningSummary,
    ValidationFailure, ValidationReport,
};
