//! # Functions
//!
//! A function is a control flow graph of basic blocks, indexed by [`BlockId`]
//! in an [`index_vec::IndexVec`] rather than a free-standing arena of raw
//! pointers.

use index_vec::IndexVec;
use rustc_hash::FxHashMap;
use std::collections::HashSet;

use crate::{
    error::OptimizerError, indent_str, types::IrType, BasicBlock, BlockId, PrettyPrint, ValueId,
};

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<ValueId>,
    blocks: IndexVec<BlockId, BasicBlock>,
    pub entry: BlockId,
    next_value_id: u32,
    value_types: FxHashMap<ValueId, IrType>,
}

impl Function {
    /// Creates a function with a single, empty entry block.
    pub fn new(name: impl Into<String>) -> Self {
        let mut blocks = IndexVec::new();
        let entry = blocks.push(BasicBlock::new("entry"));
        Self {
            name: name.into(),
            params: Vec::new(),
            blocks,
            entry,
            next_value_id: 0,
            value_types: FxHashMap::default(),
        }
    }

    pub fn add_block(&mut self, block: BasicBlock) -> BlockId {
        self.blocks.push(block)
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id]
    }

    pub fn blocks(&self) -> &IndexVec<BlockId, BasicBlock> {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut IndexVec<BlockId, BasicBlock> {
        &mut self.blocks
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.indices()
    }

    pub fn new_value_id(&mut self) -> ValueId {
        let id = ValueId::new(self.next_value_id as usize);
        self.next_value_id += 1;
        id
    }

    pub fn set_value_type(&mut self, value: ValueId, ty: IrType) {
        self.value_types.insert(value, ty);
    }

    pub fn value_type(&self, value: ValueId) -> Option<&IrType> {
        self.value_types.get(&value)
    }

    /// Blocks reachable from `entry` by following terminator targets. Used by
    /// [`crate::passes::PruneUnreachableBlocks`].
    pub fn reachable_blocks(&self) -> HashSet<BlockId> {
        let mut seen = HashSet::new();
        let mut stack = vec![self.entry];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(terminator) = self.blocks[id].terminator() {
                for target in terminator.target_blocks() {
                    if self.blocks.indices().any(|b| b == target) {
                        stack.push(target);
                    }
                }
            }
        }
        seen
    }

    pub fn unreachable_blocks(&self) -> Vec<BlockId> {
        let reachable = self.reachable_blocks();
        self.blocks
            .indices()
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    pub fn is_block_reachable(&self, id: BlockId) -> bool {
        self.reachable_blocks().contains(&id)
    }

    /// Structural validation of this function's invariants: every block ends
    /// in exactly one terminator, every terminator targets a block that
    /// exists, and every PHI operand is defined somewhere in the function.
    /// Never called by `run_dce`/`run_dse` themselves, which are infallible
    /// and treat contract violations as bugs; exposed for callers who want an
    /// explicit pre/post-condition check, e.g. in tests or tooling.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.blocks.is_empty() {
            return Err(OptimizerError::EmptyFunction);
        }
        if self.entry.index() >= self.blocks.len() {
            return Err(OptimizerError::MissingEntryBlock(self.entry));
        }

        let mut defined: HashSet<ValueId> = self.params.iter().copied().collect();
        for (id, block) in self.blocks.iter_enumerated() {
            block.validate_local(id)?;
            if let Some(terminator) = block.terminator() {
                for target in terminator.target_blocks() {
                    if target.index() >= self.blocks.len() {
                        return Err(OptimizerError::DanglingTarget { block: id, target });
                    }
                }
            }
            defined.extend(block.defined_values());
        }

        for (id, block) in self.blocks.iter_enumerated() {
            for instr in block.instructions() {
                if instr.is_phi() {
                    // PHI incoming values may come from any predecessor block,
                    // so they are exempt from the local def-before-use order
                    // check below; they are still required to be defined
                    // somewhere in the function.
                    for value in instr.used_values() {
                        if !defined.contains(&value) {
                            return Err(OptimizerError::UseBeforeDef { block: id, value });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl PrettyPrint for Function {
    fn pretty_print(&self, indent: usize) -> String {
        let mut out = format!("{}fn {}():\n", indent_str(indent), self.name);
        for block in &self.blocks {
            out.push_str(&block.pretty_print(indent + 1));
        }
        out
    }
}
