//! # Dead store elimination
//!
//! An intra-block forward scan that rewrites a store to `NOP` when a later
//! instruction in the same block is guaranteed to overwrite its effect before
//! anything can observe it, using the pointer-identity rule of
//! [`crate::Value::same_pointer`].

use super::OptimizerPass;
use crate::{Function, Instruction, Opcode, Value};

#[derive(Debug, Default)]
pub struct DeadStoreElimination;

impl DeadStoreElimination {
    pub const fn new() -> Self {
        Self
    }

    /// Scans forward from `store_index + 1` in `instructions`, deciding
    /// whether the store at `store_index` is dead:
    ///
    /// - a `LOAD` from the same pointer: the store is live, stop.
    /// - a `CALL`: may observe or alias anything, the store is live, stop.
    /// - a `STORE` to the same pointer: the earlier store is dead.
    /// - the block terminator: nothing after it can observe the store within
    ///   this block, but control leaves the block, so the store remains live
    ///   (no interprocedural or cross-block aliasing reasoning is performed).
    /// - anything else: keep scanning.
    fn store_is_dead(instructions: &[Instruction], store_index: usize) -> bool {
        let address = &instructions[store_index].operands[1];

        for candidate in &instructions[store_index + 1..] {
            match candidate.op {
                Opcode::Load if candidate.operands[0].same_pointer(address) => return false,
                Opcode::Call => return false,
                Opcode::Store if candidate.operands[1].same_pointer(address) => return true,
                _ if candidate.is_terminator() => return false,
                _ => continue,
            }
        }

        false
    }
}

impl OptimizerPass for DeadStoreElimination {
    fn run(&mut self, function: &mut Function) -> bool {
        let mut modified = false;

        for block in function.blocks_mut() {
            let instructions = block.instructions_mut();
            let store_indices: Vec<usize> = instructions
                .iter()
                .enumerate()
                .filter(|(_, instr)| instr.op == Opcode::Store)
                .map(|(i, _)| i)
                .collect();

            for index in store_indices {
                if Self::store_is_dead(instructions, index) {
                    instructions[index].make_nop();
                    modified = true;
                }
            }
        }

        if modified {
            log::debug!("dead store elimination rewrote at least one store to nop");
        }

        modified
    }

    fn name(&self) -> &'static str {
        "DeadStoreElimination"
    }
}
