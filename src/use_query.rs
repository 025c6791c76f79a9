//! # Use queries
//!
//! Whether a value is used anywhere in its defining function, and how many
//! times. DCE and DSE both need the single-value question; the batched count
//! is a convenience for passes that consume a precomputed use-count map
//! rather than re-scanning the function per candidate.

use rustc_hash::FxHashMap;

use crate::{Function, ValueId};

/// Does any instruction in `function`, in any block, read `value`?
///
/// NOP instructions are skipped: once an instruction's opcode has been
/// rewritten to `NOP` its operands are inert, even if the `Vec` slots
/// themselves are still populated.
pub fn is_used(function: &Function, value: ValueId) -> bool {
    function
        .blocks()
        .iter()
        .any(|block| block.instructions().iter().any(|instr| instr.used_values().contains(&value)))
}

/// Number of instructions across `function` that read each value.
///
/// A value absent from the returned map has zero uses. This exists purely as
/// an optimization over repeated [`is_used`] calls; DCE's fixpoint loop uses
/// it to avoid rescanning the whole function on every instruction it
/// considers removing.
pub fn use_counts(function: &Function) -> FxHashMap<ValueId, usize> {
    let mut counts = FxHashMap::default();
    for block in function.blocks() {
        for instr in block.instructions() {
            for value in instr.used_values() {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
    }
    counts
}
