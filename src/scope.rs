//! The variable collector: one full pre-pass over the program that builds
//! the slot table and validates every reference before any code is emitted.
//!
//! Declarations are whole-program and order-independent: a variable may be
//! referenced before its textual assignment, and a `goto` may jump forward
//! to a label declared later. The returned `Scope` is immutable.

use crate::ast::{Expr, Instr, Program, Rel, Term};
use thiserror::Error;

/// Machine word size of the target; one stack slot per variable.
pub const WORD_SIZE: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("ident not defined: {0}")]
    UndefinedVariable(String),
    #[error("goto target not declared: {0}")]
    UndefinedLabel(String),
}

/// Insertion-ordered slot table plus the set of declared jump labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    idents: Vec<String>,
    labels: Vec<String>,
}

impl Scope {
    /// Walk the whole program once to register every assignment target and
    /// label declaration, then validate every variable reference and goto
    /// target against what was found.
    pub fn collect(program: &Program) -> Result<Scope, ScopeError> {
        let mut scope = Scope {
            idents: Vec::new(),
            labels: Vec::new(),
        };
        for instr in &program.instrs {
            scope.declare_instr(instr);
        }
        for instr in &program.instrs {
            scope.check_instr(instr)?;
        }
        Ok(scope)
    }

    /// Variable names in slot order: the k-th name has slot index k.
    pub fn idents(&self) -> &[String] {
        &self.idents
    }

    pub fn slot(&self, ident: &str) -> Option<usize> {
        self.idents.iter().position(|i| i == ident)
    }

    /// Total stack frame size of the emitted program.
    pub fn frame_size(&self) -> usize {
        self.idents.len() * WORD_SIZE
    }

    fn declare_instr(&mut self, instr: &Instr) {
        match instr {
            Instr::Assign { ident, .. } => {
                if !self.idents.iter().any(|i| i == ident) {
                    self.idents.push(ident.clone());
                }
            }
            Instr::If { instr, .. } => self.declare_instr(instr),
            Instr::Label { name } => {
                if !self.labels.iter().any(|l| l == name) {
                    self.labels.push(name.clone());
                }
            }
            Instr::Goto { .. } | Instr::Output { .. } => {}
        }
    }

    fn check_instr(&self, instr: &Instr) -> Result<(), ScopeError> {
        match instr {
            Instr::Assign { expr, .. } => self.check_expr(expr),
            Instr::If { rel, instr } => {
                self.check_rel(rel)?;
                self.check_instr(instr)
            }
            Instr::Goto { label } => {
                if self.labels.iter().any(|l| l == label) {
                    Ok(())
                } else {
                    Err(ScopeError::UndefinedLabel(label.clone()))
                }
            }
            Instr::Output { term } => self.check_term(term),
            Instr::Label { .. } => Ok(()),
        }
    }

    fn check_expr(&self, expr: &Expr) -> Result<(), ScopeError> {
        match expr {
            Expr::Single { term } => self.check_term(term),
            Expr::Plus { lhs, rhs } | Expr::Minus { lhs, rhs } | Expr::Mul { lhs, rhs } => {
                self.check_term(lhs)?;
                self.check_term(rhs)
            }
        }
    }

    fn check_rel(&self, rel: &Rel) -> Result<(), ScopeError> {
        match rel {
            Rel::LessThan { lhs, rhs }
            | Rel::LessThanEqual { lhs, rhs }
            | Rel::Equal { lhs, rhs } => {
                self.check_term(lhs)?;
                self.check_term(rhs)
            }
        }
    }

    fn check_term(&self, term: &Term) -> Result<(), ScopeError> {
        match term {
            Term::Input | Term::Int(_) => Ok(()),
            Term::Ident(name) => {
                if self.idents.iter().any(|i| i == name) {
                    Ok(())
                } else {
                    Err(ScopeError::UndefinedVariable(name.clone()))
                }
            }
        }
    }
}
