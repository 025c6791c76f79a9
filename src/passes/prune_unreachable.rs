//! # Unreachable block pruning
//!
//! A supplemental, block-granularity pass that neutralizes blocks
//! unreachable from the entry, distinct from the instruction-level dead-code
//! pass this crate calls [`crate::passes::DeadCodeElimination`]. The two are
//! kept as separate passes with separate names since one reasons over blocks
//! and the other over individual instructions.

use super::OptimizerPass;
use crate::{Function, Instruction};

#[derive(Debug, Default)]
pub struct PruneUnreachableBlocks;

impl PruneUnreachableBlocks {
    pub const fn new() -> Self {
        Self
    }
}

impl OptimizerPass for PruneUnreachableBlocks {
    fn run(&mut self, function: &mut Function) -> bool {
        let mut unreachable = function.unreachable_blocks();
        if unreachable.is_empty() {
            return false;
        }

        // Stable order is unnecessary here (each block is independent), but
        // keeping it deterministic helps test assertions and log output.
        unreachable.sort_by_key(|id| id.index());

        for block_id in unreachable {
            let block = function.block_mut(block_id);
            if block.instruction_count() == 1 && block.instructions()[0] == Instruction::ret(None)
            {
                // Already neutralized by a previous run; nothing to do.
                continue;
            }
            log::debug!("pruning unreachable block {block_id:?}");
            block.instructions_mut().clear();
            block.push_instruction(Instruction::ret(None));
        }

        true
    }

    fn name(&self) -> &'static str {
        "PruneUnreachableBlocks"
    }
}
