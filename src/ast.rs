//! AST node families produced by the parser and consumed read-only by the
//! variable collector and the code generator.
//!
//! Binary expressions and relations hold exactly two terms, never a nested
//! tree: the grammar admits at most one operator per expression, so no
//! precedence exists.

/// An atomic value-producing unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A blocking read of one line from stdin, parsed as an unsigned integer.
    Input,
    /// An integer literal, kept as its source digits.
    Int(String),
    /// A variable reference.
    Ident(String),
}

/// The right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Single { term: Term },
    Plus { lhs: Term, rhs: Term },
    Minus { lhs: Term, rhs: Term },
    Mul { lhs: Term, rhs: Term },
}

/// A two-term comparison, always normalized to 0/1 by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rel {
    LessThan { lhs: Term, rhs: Term },
    LessThanEqual { lhs: Term, rhs: Term },
    Equal { lhs: Term, rhs: Term },
}

/// A single program instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    /// Assignment of an expression to a variable.
    Assign { ident: String, expr: Expr },
    /// A conditional governing exactly one inner instruction.
    If { rel: Rel, instr: Box<Instr> },
    /// An unconditional jump to a user-declared label.
    Goto { label: String },
    /// Write one unsigned integer plus a newline to stdout.
    Output { term: Term },
    /// A label declaration: a position marker with no effect of its own.
    Label { name: String },
}

/// A whole compilation unit: an ordered instruction list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub instrs: Vec<Instr>,
}
