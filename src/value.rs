//! # Values
//!
//! This module defines values and operands flowing through the IR.
//!
//! Two `Value`s are "the same value" iff they compare equal: for `Operand`,
//! `Global` and `Arg`, equality is identifier equality, which stands in for
//! raw-pointer identity in a pointer-based IR. No other equivalence is ever
//! inferred, which is what keeps the pointer-identity rule in
//! [`crate::passes::dse`] sound.

use crate::{GlobalId, PrettyPrint, ValueId};

/// Represents any value in the program: literals, SSA operands, globals, arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// A constant literal, embedded directly rather than produced by an instruction.
    Literal(Literal),

    /// A reference to the value produced by some instruction in the function.
    Operand(ValueId),

    /// A reference to a global symbol (function address, static data).
    Global(GlobalId),

    /// A reference to an incoming function argument.
    Arg(u32),
}

/// Literal constant values, embedded directly rather than computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Unit,
}

impl Value {
    pub const fn int(value: i64) -> Self {
        Self::Literal(Literal::Int(value))
    }

    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    pub const fn unit() -> Self {
        Self::Literal(Literal::Unit)
    }

    pub const fn operand(id: ValueId) -> Self {
        Self::Operand(id)
    }

    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub const fn is_operand(&self) -> bool {
        matches!(self, Self::Operand(_))
    }

    pub const fn as_operand(&self) -> Option<ValueId> {
        match self {
            Self::Operand(id) => Some(*id),
            _ => None,
        }
    }

    /// Two operand `Value`s denote "definitely the same pointer" iff they are
    /// equal. Distinct kinds (e.g. an `Operand` and a `Global`) are never
    /// considered the same pointer, and neither are two distinct
    /// `Operand`/`Global` ids; alias reasoning beyond SSA identity is
    /// explicitly out of scope.
    pub fn same_pointer(&self, other: &Self) -> bool {
        self == other
    }
}

impl From<ValueId> for Value {
    fn from(id: ValueId) -> Self {
        Self::operand(id)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::int(value)
    }
}

impl PrettyPrint for Value {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Literal(lit) => lit.pretty_print(0),
            Self::Operand(id) => format!("%{}", id.index()),
            Self::Global(id) => format!("@{}", id.index()),
            Self::Arg(i) => format!("arg{i}"),
        }
    }
}

impl PrettyPrint for Literal {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Unit => "()".to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_print(0))
    }
}
