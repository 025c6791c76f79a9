//! # Error handling
//!
//! DCE/DSE themselves have no recoverable error conditions: contract
//! violations are bugs and are asserted, not reported. `OptimizerError`
//! exists for the one genuinely-reportable failure this crate has: a caller
//! explicitly asking [`crate::Pipeline`] to validate a function that turns
//! out not to satisfy the structural invariants of the IR.

use crate::BlockId;

/// Errors reportable from the structural-validation entry points of this crate.
///
/// Never returned by `run_dce`/`run_dse` themselves, which are infallible and
/// return a plain `bool`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptimizerError {
    #[error("function has no basic blocks")]
    EmptyFunction,

    #[error("entry block {0:?} does not exist")]
    MissingEntryBlock(BlockId),

    #[error("block {block:?} does not end in a terminator")]
    MissingTerminator { block: BlockId },

    #[error("block {block:?} contains a terminator before its last instruction")]
    TerminatorNotLast { block: BlockId },

    #[error("block {block:?} terminator targets non-existent block {target:?}")]
    DanglingTarget { block: BlockId, target: BlockId },

    #[error("value {value:?} in block {block:?} is used before any instruction defines it")]
    UseBeforeDef {
        block: BlockId,
        value: crate::ValueId,
    },
}

pub type OptimizerResult<T> = Result<T, OptimizerError>;
