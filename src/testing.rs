//! # Testing utilities
//!
//! Builder helpers for constructing small [`Function`] fixtures concisely,
//! used across this crate's unit tests and the integration suite under
//! `tests/`.

use crate::{BasicBlock, BlockId, Function, Instruction, Opcode, Value, ValueId};

/// Builder for creating test functions.
pub struct TestFunctionBuilder {
    function: Function,
}

impl TestFunctionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            function: Function::new(name),
        }
    }

    /// A block builder for the entry block.
    pub fn block(&mut self) -> TestBlockBuilder<'_> {
        let block_id = self.function.entry;
        TestBlockBuilder {
            function: &mut self.function,
            current_block: block_id,
        }
    }

    /// Adds a new basic block and returns a block builder for it.
    pub fn new_block(&mut self) -> TestBlockBuilder<'_> {
        let block_id = self.function.add_block(BasicBlock::unnamed());
        self.block_at(block_id)
    }

    /// Returns a block builder for a previously added block, so a block can
    /// be populated after its id is already known (e.g. a branch's targets).
    pub fn block_at(&mut self, block_id: BlockId) -> TestBlockBuilder<'_> {
        TestBlockBuilder {
            function: &mut self.function,
            current_block: block_id,
        }
    }

    /// Adds an empty block without returning a builder for it, for callers
    /// that need its id before they are ready to populate it (e.g. to wire
    /// up a branch's targets first).
    pub fn build_placeholder_block(&mut self) -> BlockId {
        self.function.add_block(BasicBlock::unnamed())
    }

    pub fn parameter(&mut self) -> ValueId {
        let value_id = self.function.new_value_id();
        self.function.params.push(value_id);
        value_id
    }

    pub fn build(self) -> Function {
        self.function
    }
}

/// Builder for populating a single basic block.
pub struct TestBlockBuilder<'a> {
    function: &'a mut Function,
    current_block: BlockId,
}

impl TestBlockBuilder<'_> {
    fn push(&mut self, instruction: Instruction) {
        self.function
            .block_mut(self.current_block)
            .push_instruction(instruction);
    }

    pub fn store(&mut self, value: Value, address: Value) -> &mut Self {
        self.push(Instruction::store(value, address));
        self
    }

    pub fn load(&mut self, address: Value) -> ValueId {
        let dest = self.function.new_value_id();
        self.push(Instruction::load(dest, address));
        dest
    }

    pub fn binary(&mut self, op: Opcode, lhs: Value, rhs: Value) -> ValueId {
        let dest = self.function.new_value_id();
        self.push(Instruction::binary(op, dest, lhs, rhs));
        dest
    }

    pub fn call(&mut self, callee: Value, args: Vec<Value>, has_result: bool) -> Option<ValueId> {
        let dest = has_result.then(|| self.function.new_value_id());
        self.push(Instruction::call(dest, callee, args));
        dest
    }

    pub fn jump(&mut self, target: BlockId) {
        self.push(Instruction::br(target));
    }

    pub fn branch(&mut self, condition: Value, then_target: BlockId, else_target: BlockId) {
        self.push(Instruction::br_cond(condition, then_target, else_target));
    }

    pub fn ret(&mut self, value: Option<Value>) {
        self.push(Instruction::ret(value));
    }

    pub fn block_id(&self) -> BlockId {
        self.current_block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_a_valid_function() {
        let mut builder = TestFunctionBuilder::new("sample");
        let param = builder.parameter();
        let mut block = builder.block();
        let doubled = block.binary(Opcode::Add, Value::operand(param), Value::operand(param));
        block.ret(Some(Value::operand(doubled)));
        let function = builder.build();

        assert!(function.validate().is_ok());
        assert_eq!(function.block(function.entry).instruction_count(), 2);
    }

    #[test]
    fn builder_supports_multiple_blocks_and_branches() {
        let mut builder = TestFunctionBuilder::new("branchy");
        let cond = builder.parameter();

        let then_block = builder.build_placeholder_block();
        let else_block = builder.build_placeholder_block();
        builder
            .block()
            .branch(Value::operand(cond), then_block, else_block);
        builder.block_at(then_block).ret(Some(Value::int(1)));
        builder.block_at(else_block).ret(Some(Value::int(0)));

        let function = builder.build();
        assert!(function.validate().is_ok());
    }
}
