//! # Instructions
//!
//! This module defines the instruction type for the IR. An instruction is a
//! tagged `op` plus an ordered `operands` array, with the block terminators
//! (`BR`/`BR_COND`/`SWITCH`/`RET`) modeled as ordinary opcodes rather than a
//! separate "terminator" type.

use std::collections::HashSet;

use crate::{types::IrType, BlockId, PrettyPrint, Value, ValueId};

/// Comparison predicates available to the `CMP` opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpPredicate {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl std::fmt::Display for CmpPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        };
        write!(f, "{s}")
    }
}

/// The opcode of an instruction.
///
/// Opcodes form a closed, tagged enumeration; side-effect classification and
/// operand-count conventions are table-driven off this tag rather than
/// attached to per-opcode payload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Logically-deleted placeholder, awaiting removal by DCE.
    Nop,

    /// `dest = load operands[0]`
    Load,
    /// `store operands[0] -> operands[1]` (value, then destination pointer).
    Store,
    /// `[dest] = call operands[0](operands[1..])` (callee, then arguments).
    Call,

    /// `br`, an unconditional jump to `targets[0]`. Terminator.
    Br,
    /// `br_cond operands[0], targets[0] (then), targets[1] (else)`. Terminator.
    BrCond,
    /// `switch operands[0], default targets[0], cases targets[1..]`. Terminator.
    Switch,
    /// `ret [operands[0]]`. Terminator.
    Ret,

    /// `dest = phi [...]`. Incoming values live in `operands`, paired
    /// positionally with `phi_blocks`.
    Phi,

    // Pure arithmetic.
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Pure comparison.
    Cmp(CmpPredicate),
    // Pure unary.
    Not,
    Neg,
    // Pure conversion.
    Cast,
}

impl Opcode {
    /// Terminator opcodes end a block; one is required at the end of every block.
    pub const fn is_terminator(self) -> bool {
        matches!(self, Self::Br | Self::BrCond | Self::Switch | Self::Ret)
    }

    /// Side-effectful opcodes are never removed by DCE regardless of result usage.
    pub const fn has_side_effects(self) -> bool {
        matches!(
            self,
            Self::Store | Self::Call | Self::Br | Self::BrCond | Self::Switch | Self::Ret
        )
    }

    /// Pure opcodes may be removed by DCE once their result is unused.
    /// `NOP` is handled separately by DCE (it is always removed, never judged
    /// on purity) and is deliberately excluded from this predicate.
    pub const fn is_pure(self) -> bool {
        !self.has_side_effects() && !matches!(self, Self::Nop)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nop => write!(f, "nop"),
            Self::Load => write!(f, "load"),
            Self::Store => write!(f, "store"),
            Self::Call => write!(f, "call"),
            Self::Br => write!(f, "br"),
            Self::BrCond => write!(f, "br_cond"),
            Self::Switch => write!(f, "switch"),
            Self::Ret => write!(f, "ret"),
            Self::Phi => write!(f, "phi"),
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
            Self::Mod => write!(f, "mod"),
            Self::Cmp(p) => write!(f, "cmp.{p}"),
            Self::Not => write!(f, "not"),
            Self::Neg => write!(f, "neg"),
            Self::Cast => write!(f, "cast"),
        }
    }
}

/// Control-flow payload for terminator instructions.
///
/// Kept separate from `operands: Vec<Value>` because targets name `BlockId`s,
/// not `Value`s, and the use-query scan only ever needs to compare `Value`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFlow {
    /// Non-terminator instructions carry no control-flow payload.
    None,
    Jump { target: BlockId },
    Branch { then_target: BlockId, else_target: BlockId },
    Switch { cases: Vec<(i64, BlockId)>, default: BlockId },
}

impl ControlFlow {
    pub fn target_blocks(&self) -> Vec<BlockId> {
        match self {
            Self::None => vec![],
            Self::Jump { target } => vec![*target],
            Self::Branch { then_target, else_target } => vec![*then_target, *else_target],
            Self::Switch { cases, default } => {
                let mut targets: Vec<BlockId> = cases.iter().map(|(_, b)| *b).collect();
                targets.push(*default);
                targets
            }
        }
    }
}

/// An instruction performs a computation or transfers control, but never both.
///
/// # Design Notes
///
/// - Follows three-address code conventions: at most one operation, at most
///   one result.
/// - `operands[0 .. operands.len())` are the value operands named by `op`'s
///   convention (e.g. for `STORE`: `[value, address]`).
/// - For `PHI`, `operands` holds exactly the incoming values and `phi_blocks`
///   the parallel predecessor blocks; `num_phi_incoming()` equals
///   `operands.len()` in that case, so a use-query scan over incoming values
///   and one over general operands collapse to the single `operands` scan
///   here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub operands: Vec<Value>,
    /// Predecessor block for each entry of `operands`, only meaningful when
    /// `op == Phi`; always the same length as `operands` in that case.
    pub phi_blocks: Vec<BlockId>,
    pub control: ControlFlow,
    pub result: Option<ValueId>,
    pub ty: Option<IrType>,
    pub comment: Option<String>,
}

impl Instruction {
    fn bare(op: Opcode, operands: Vec<Value>, result: Option<ValueId>) -> Self {
        Self {
            op,
            operands,
            phi_blocks: Vec::new(),
            control: ControlFlow::None,
            result,
            ty: None,
            comment: None,
        }
    }

    pub fn nop() -> Self {
        Self::bare(Opcode::Nop, Vec::new(), None)
    }

    pub fn load(dest: ValueId, address: Value) -> Self {
        Self::bare(Opcode::Load, vec![address], Some(dest))
    }

    pub fn store(value: Value, address: Value) -> Self {
        Self::bare(Opcode::Store, vec![value, address], None)
    }

    pub fn call(dest: Option<ValueId>, callee: Value, args: Vec<Value>) -> Self {
        let mut operands = Vec::with_capacity(args.len() + 1);
        operands.push(callee);
        operands.extend(args);
        Self::bare(Opcode::Call, operands, dest)
    }

    pub fn binary(op: Opcode, dest: ValueId, lhs: Value, rhs: Value) -> Self {
        debug_assert!(matches!(
            op,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod | Opcode::Cmp(_)
        ));
        Self::bare(op, vec![lhs, rhs], Some(dest))
    }

    pub fn unary(op: Opcode, dest: ValueId, source: Value) -> Self {
        debug_assert!(matches!(op, Opcode::Not | Opcode::Neg | Opcode::Cast));
        Self::bare(op, vec![source], Some(dest))
    }

    pub fn phi(dest: ValueId, incoming: Vec<(BlockId, Value)>) -> Self {
        let (blocks, values): (Vec<_>, Vec<_>) = incoming.into_iter().unzip();
        Self {
            op: Opcode::Phi,
            operands: values,
            phi_blocks: blocks,
            control: ControlFlow::None,
            result: Some(dest),
            ty: None,
            comment: None,
        }
    }

    pub fn br(target: BlockId) -> Self {
        Self {
            control: ControlFlow::Jump { target },
            ..Self::bare(Opcode::Br, Vec::new(), None)
        }
    }

    pub fn br_cond(condition: Value, then_target: BlockId, else_target: BlockId) -> Self {
        Self {
            control: ControlFlow::Branch { then_target, else_target },
            ..Self::bare(Opcode::BrCond, vec![condition], None)
        }
    }

    pub fn switch(scrutinee: Value, cases: Vec<(i64, BlockId)>, default: BlockId) -> Self {
        Self {
            control: ControlFlow::Switch { cases, default },
            ..Self::bare(Opcode::Switch, vec![scrutinee], None)
        }
    }

    pub fn ret(value: Option<Value>) -> Self {
        Self::bare(Opcode::Ret, value.into_iter().collect(), None)
    }

    pub const fn with_type(mut self, ty: IrType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Number of meaningful entries in `operands`.
    pub fn num_operands(&self) -> usize {
        self.operands.len()
    }

    /// For `PHI`, the count of incoming (value, predecessor-block) pairs; `0`
    /// otherwise.
    pub fn num_phi_incoming(&self) -> usize {
        if self.op == Opcode::Phi {
            self.operands.len()
        } else {
            0
        }
    }

    pub const fn is_terminator(&self) -> bool {
        self.op.is_terminator()
    }

    pub const fn has_side_effects(&self) -> bool {
        self.op.has_side_effects()
    }

    pub const fn is_pure(&self) -> bool {
        self.op.is_pure()
    }

    pub const fn is_nop(&self) -> bool {
        matches!(self.op, Opcode::Nop)
    }

    pub const fn is_phi(&self) -> bool {
        matches!(self.op, Opcode::Phi)
    }

    /// The value this instruction defines, if any.
    pub const fn destination(&self) -> Option<ValueId> {
        self.result
    }

    /// All target blocks this instruction's control flow may transfer to.
    /// Empty for every non-terminator.
    pub fn target_blocks(&self) -> Vec<BlockId> {
        self.control.target_blocks()
    }

    /// Rewrites this instruction's `op` to `NOP`, as DSE does to a redundant
    /// store. Operands, result and position are left untouched; they do
    /// nothing once the opcode is `NOP`.
    pub fn make_nop(&mut self) {
        self.op = Opcode::Nop;
    }

    /// All values used (read) by this instruction: the union of the general
    /// operand range and the phi-incoming range, collapsed into one scan
    /// since for `PHI` they are the same range.
    pub fn used_values(&self) -> HashSet<ValueId> {
        if self.is_nop() {
            return HashSet::new();
        }
        self.operands
            .iter()
            .filter_map(Value::as_operand)
            .collect()
    }

    /// Replace every operand referencing `from` with `to`. Used by passes that
    /// forward values (e.g. a future copy-propagation pass); DCE/DSE never
    /// call this themselves.
    pub fn replace_value_uses(&mut self, from: ValueId, to: ValueId) {
        if from == to {
            return;
        }
        for operand in &mut self.operands {
            if *operand == Value::Operand(from) {
                *operand = Value::Operand(to);
            }
        }
    }
}

impl PrettyPrint for Instruction {
    fn pretty_print(&self, _indent: usize) -> String {
        let dest = self
            .result
            .map(|id| format!("%{} = ", id.index()))
            .unwrap_or_default();

        let rendered_op = match (&self.op, &self.control) {
            (Opcode::Br, ControlFlow::Jump { target }) => format!("br {target:?}"),
            (
                Opcode::BrCond,
                ControlFlow::Branch { then_target, else_target },
            ) => format!(
                "br_cond {}, {then_target:?}, {else_target:?}",
                self.operands[0].pretty_print(0)
            ),
            (Opcode::Switch, ControlFlow::Switch { cases, default }) => {
                let cases = cases
                    .iter()
                    .map(|(v, b)| format!("{v}: {b:?}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "switch {}, default {default:?}, [{cases}]",
                    self.operands[0].pretty_print(0)
                )
            }
            (Opcode::Ret, _) => match self.operands.first() {
                Some(value) => format!("ret {}", value.pretty_print(0)),
                None => "ret".to_string(),
            },
            (Opcode::Phi, _) => {
                let incoming = self
                    .phi_blocks
                    .iter()
                    .zip(&self.operands)
                    .map(|(b, v)| format!("{b:?}: {}", v.pretty_print(0)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("phi [{incoming}]")
            }
            (Opcode::Nop, _) => "nop".to_string(),
            (op, _) => {
                let operands = self
                    .operands
                    .iter()
                    .map(|v| v.pretty_print(0))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{op} {operands}")
            }
        };

        format!("{dest}{rendered_op}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_operands_are_value_then_address() {
        let v = Value::int(1);
        let p = Value::operand(ValueId::new(0));
        let store = Instruction::store(v, p);
        assert_eq!(store.operands[0], v);
        assert_eq!(store.operands[1], p);
        assert!(store.destination().is_none());
        assert!(store.has_side_effects());
        assert!(!store.is_pure());
    }

    #[test]
    fn phi_operands_equal_phi_blocks_length() {
        let b0 = BlockId::new(0);
        let b1 = BlockId::new(1);
        let phi = Instruction::phi(
            ValueId::new(5),
            vec![
                (b0, Value::operand(ValueId::new(1))),
                (b1, Value::operand(ValueId::new(2))),
            ],
        );
        assert_eq!(phi.num_phi_incoming(), 2);
        assert_eq!(phi.num_operands(), 2);
        assert_eq!(phi.used_values().len(), 2);
    }

    #[test]
    fn nop_uses_nothing_even_if_operands_are_left_in_place() {
        let mut store = Instruction::store(Value::int(1), Value::operand(ValueId::new(0)));
        store.make_nop();
        assert!(store.is_nop());
        assert!(store.used_values().is_empty());
        // Operands are left in place: they simply do nothing once the
        // opcode is NOP.
        assert_eq!(store.operands.len(), 2);
    }

    #[test]
    fn call_is_never_pure() {
        let call = Instruction::call(Some(ValueId::new(0)), Value::Global(crate::GlobalId::new(0)), vec![]);
        assert!(!call.is_pure());
        assert!(call.has_side_effects());
    }

    #[test]
    fn arithmetic_is_pure_and_not_a_terminator() {
        let add = Instruction::binary(
            Opcode::Add,
            ValueId::new(2),
            Value::operand(ValueId::new(0)),
            Value::operand(ValueId::new(1)),
        );
        assert!(add.is_pure());
        assert!(!add.is_terminator());
        assert_eq!(add.used_values().len(), 2);
    }

    #[test]
    fn terminators_report_their_targets() {
        let br_cond = Instruction::br_cond(
            Value::operand(ValueId::new(0)),
            BlockId::new(1),
            BlockId::new(2),
        );
        assert!(br_cond.is_terminator());
        assert_eq!(
            br_cond.target_blocks(),
            vec![BlockId::new(1), BlockId::new(2)]
        );
    }
}
