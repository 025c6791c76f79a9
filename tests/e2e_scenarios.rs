//! End-to-end optimizer scenarios.
//!
//! Each test below mirrors one of the worked scenarios this optimizer is
//! specified against: straight-line blocks of stores, loads, calls and pure
//! arithmetic, run through the standard DSE-then-DCE pipeline and checked
//! against the exact surviving instruction shape.

use anvil_optimizer::{run_dce, run_dse, Opcode, Value};
use anvil_optimizer::testing::TestFunctionBuilder;

mod common;

#[test]
fn redundant_store_intra_block_collapses_to_the_second_store() {
    common::init_logging();
    let mut builder = TestFunctionBuilder::new("redundant_store");
    let ptr = builder.parameter();
    let mut block = builder.block();
    block.store(Value::int(1), Value::operand(ptr));
    block.store(Value::int(2), Value::operand(ptr));
    block.ret(None);
    let mut f = builder.build();

    assert!(run_dse(&mut f));
    assert!(run_dce(&mut f));

    let instrs = f.block(f.entry).instructions();
    assert_eq!(instrs.len(), 2);
    assert_eq!(instrs[0].op, Opcode::Store);
    assert_eq!(instrs[1].op, Opcode::Ret);
}

#[test]
fn store_load_store_is_left_untouched() {
    let mut builder = TestFunctionBuilder::new("store_load_store");
    let ptr = builder.parameter();
    let mut block = builder.block();
    block.store(Value::int(1), Value::operand(ptr));
    let x = block.load(Value::operand(ptr));
    block.store(Value::int(2), Value::operand(ptr));
    block.ret(Some(Value::operand(x)));
    let mut f = builder.build();

    assert!(!run_dse(&mut f));
    assert!(!run_dce(&mut f));
    assert_eq!(f.block(f.entry).instruction_count(), 4);
}

#[test]
fn store_call_store_keeps_both_stores() {
    let mut builder = TestFunctionBuilder::new("store_call_store");
    let ptr = builder.parameter();
    let callee = anvil_optimizer::GlobalId::new(0);
    let mut block = builder.block();
    block.store(Value::int(1), Value::operand(ptr));
    block.call(Value::Global(callee), vec![], false);
    block.store(Value::int(2), Value::operand(ptr));
    block.ret(None);
    let mut f = builder.build();

    assert!(!run_dse(&mut f));
    assert!(!run_dce(&mut f));
    assert_eq!(f.block(f.entry).instruction_count(), 4);
}

#[test]
fn chained_dead_pure_arithmetic_fully_collapses_via_fixpoint() {
    let mut builder = TestFunctionBuilder::new("dead_arithmetic_chain");
    let mut block = builder.block();
    let a = block.binary(Opcode::Add, Value::int(1), Value::int(2));
    let b = block.binary(Opcode::Mul, Value::operand(a), Value::int(3));
    let _c = block.binary(Opcode::Sub, Value::operand(b), Value::int(1));
    block.ret(Some(Value::int(0)));
    let mut f = builder.build();

    assert!(run_dce(&mut f));
    let instrs = f.block(f.entry).instructions();
    assert_eq!(instrs.len(), 1);
    assert_eq!(instrs[0].op, Opcode::Ret);
}

#[test]
fn values_used_only_via_phi_survive_dce() {
    let mut builder = TestFunctionBuilder::new("phi_keeps_both_incoming");
    let b1 = builder.build_placeholder_block();
    let b2 = builder.build_placeholder_block();
    let b3 = builder.build_placeholder_block();

    let a = builder.block_at(b1).binary(Opcode::Add, Value::int(1), Value::int(2));
    builder.block_at(b1).jump(b3);

    let b = builder.block_at(b2).binary(Opcode::Add, Value::int(3), Value::int(4));
    builder.block_at(b2).jump(b3);

    let mut f = builder.build();
    let phi_dest = f.new_value_id();
    f.block_mut(b3).push_instruction(anvil_optimizer::Instruction::phi(
        phi_dest,
        vec![(b1, Value::operand(a)), (b2, Value::operand(b))],
    ));
    f.block_mut(b3).push_instruction(anvil_optimizer::Instruction::ret(Some(Value::operand(
        phi_dest,
    ))));

    assert!(!run_dce(&mut f));
    assert_eq!(f.block(b1).instruction_count(), 2);
    assert_eq!(f.block(b2).instruction_count(), 2);
    assert_eq!(f.block(b3).instruction_count(), 2);
}

#[test]
fn store_to_one_pointer_is_dead_even_with_an_intervening_load_from_another() {
    let mut builder = TestFunctionBuilder::new("distinct_pointers");
    let p = builder.parameter();
    let q = builder.parameter();
    let mut block = builder.block();
    block.store(Value::int(1), Value::operand(p));
    let x = block.load(Value::operand(q));
    block.store(Value::int(2), Value::operand(p));
    block.ret(Some(Value::operand(x)));
    let mut f = builder.build();

    assert!(run_dse(&mut f));
    assert!(run_dce(&mut f));

    let instrs = f.block(f.entry).instructions();
    assert_eq!(instrs.len(), 3);
    assert_eq!(instrs[0].op, Opcode::Load);
    assert_eq!(instrs[1].op, Opcode::Store);
    assert_eq!(instrs[2].op, Opcode::Ret);
}

#[test]
fn cross_block_store_is_never_eliminated_by_dse() {
    let mut builder = TestFunctionBuilder::new("cross_block_store");
    let ptr = builder.parameter();
    let b2 = builder.build_placeholder_block();

    let mut entry = builder.block();
    entry.store(Value::int(1), Value::operand(ptr));
    entry.jump(b2);

    let x = builder.block_at(b2).load(Value::operand(ptr));
    builder.block_at(b2).ret(Some(Value::operand(x)));

    let mut f = builder.build();
    assert!(!run_dse(&mut f));
    assert_eq!(f.block(f.entry).instruction_count(), 2);
}
