//! # Basic blocks
//!
//! A basic block is a straight-line run of instructions ending in exactly one
//! terminator. Instructions are stored in a plain `Vec` rather than an
//! intrusive doubly-linked list, so callers thread position via
//! `(BlockId, index)` pairs instead of a `parent` back-link.

use std::collections::HashSet;

use crate::{error::OptimizerError, indent_str, Instruction, PrettyPrint, ValueId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasicBlock {
    /// Optional human-readable label, purely for pretty-printing.
    pub name: Option<String>,
    instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            instructions: Vec::new(),
        }
    }

    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn push_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn has_terminator(&self) -> bool {
        self.instructions.last().is_some_and(Instruction::is_terminator)
    }

    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|i| i.is_terminator())
    }

    pub fn terminator_mut(&mut self) -> Option<&mut Instruction> {
        if self.has_terminator() {
            self.instructions.last_mut()
        } else {
            None
        }
    }

    /// Removes the instruction at `index`, shifting later instructions down.
    /// Never removes a terminator: callers rewrite terminators to `NOP` like
    /// any other dead instruction, they are never physically deleted since
    /// that would break `has_terminator`/block-well-formedness mid-pass (DCE
    /// only ever sees NOP'd non-terminators here, since terminators are never
    /// NOP'd).
    pub fn remove(&mut self, index: usize) -> Instruction {
        self.instructions.remove(index)
    }

    /// All values read by any instruction in this block.
    pub fn used_values(&self) -> HashSet<ValueId> {
        self.instructions
            .iter()
            .flat_map(Instruction::used_values)
            .collect()
    }

    /// All values defined by any instruction in this block.
    pub fn defined_values(&self) -> HashSet<ValueId> {
        self.instructions
            .iter()
            .filter_map(Instruction::destination)
            .collect()
    }

    /// Structural checks local to this block: exactly one terminator, and it
    /// must be last.
    pub fn validate_local(&self, block: crate::BlockId) -> Result<(), OptimizerError> {
        if self.instructions.is_empty() {
            return Err(OptimizerError::MissingTerminator { block });
        }
        for (i, instr) in self.instructions.iter().enumerate() {
            let is_last = i == self.instructions.len() - 1;
            if instr.is_terminator() && !is_last {
                return Err(OptimizerError::TerminatorNotLast { block });
            }
        }
        if !self.has_terminator() {
            return Err(OptimizerError::MissingTerminator { block });
        }
        Ok(())
    }

    /// Opcode `NOP` instructions still occupying a slot, pending removal by
    /// [`crate::passes::DeadCodeElimination`].
    pub fn nop_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_nop()).count()
    }
}

impl PrettyPrint for BasicBlock {
    fn pretty_print(&self, indent: usize) -> String {
        let label = self.name.as_deref().unwrap_or("<block>");
        let mut out = format!("{}{label}:\n", indent_str(indent));
        for instr in &self.instructions {
            out.push_str(&indent_str(indent + 1));
            out.push_str(&instr.pretty_print(indent + 1));
            out.push('\n');
        }
        out
    }
}
