//! # Dead code elimination
//!
//! Repeatedly removes `NOP` instructions and pure instructions whose result
//! is unused, until a full sweep makes no change. Fixpoint iteration is
//! required because removing one dead instruction can make the instruction
//! that fed it dead in turn.

use super::OptimizerPass;
use crate::{use_query, Function};

#[derive(Debug, Default)]
pub struct DeadCodeElimination;

impl DeadCodeElimination {
    pub const fn new() -> Self {
        Self
    }

    /// One sweep over every block: remove `NOP`s and unused-pure
    /// instructions. Returns whether anything was removed.
    fn sweep_once(function: &mut Function) -> bool {
        let use_counts = use_query::use_counts(function);
        let mut removed_any = false;

        for block in function.blocks_mut() {
            let instructions = block.instructions_mut();
            let mut index = 0;
            while index < instructions.len() {
                let instr = &instructions[index];
                let is_dead = instr.is_nop()
                    || (instr.is_pure()
                        && instr
                            .destination()
                            .is_some_and(|dest| use_counts.get(&dest).copied().unwrap_or(0) == 0));

                if is_dead {
                    instructions.remove(index);
                    removed_any = true;
                } else {
                    index += 1;
                }
            }
        }

        removed_any
    }
}

impl OptimizerPass for DeadCodeElimination {
    fn run(&mut self, function: &mut Function) -> bool {
        let mut modified = false;
        loop {
            if !Self::sweep_once(function) {
                break;
            }
            modified = true;
        }

        if modified {
            log::debug!("dead code elimination reached fixpoint for function '{}'", function.name);
        }

        modified
    }

    fn name(&self) -> &'static str {
        "DeadCodeElimination"
    }
}
