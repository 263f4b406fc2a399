//! Recursive-descent parsing with one token of lookahead and no backtracking.
//!
//! Instruction dispatch is fixed on the leading token kind; every structural
//! mismatch is a fatal error naming the expected and the found kind. There is
//! no recovery or resynchronization.

use crate::ast::{Expr, Instr, Program, Rel, Term};
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, found: {found}")]
    Expected {
        expected: TokenKind,
        found: TokenKind,
        offset: usize,
    },
    #[error("expected rel token (lessthan, lessthanequal, doubleequal), found: {found}")]
    ExpectedRel { found: TokenKind, offset: usize },
    #[error("expected term token (input, int, or ident), found: {found}")]
    ExpectedTerm { found: TokenKind, offset: usize },
    #[error("unexpected token kind: {found}")]
    UnexpectedInstr { found: TokenKind, offset: usize },
}

impl ParseError {
    /// Byte offset of the offending token, for diagnostics.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Expected { offset, .. }
            | ParseError::ExpectedRel { offset, .. }
            | ParseError::ExpectedTerm { offset, .. }
            | ParseError::UnexpectedInstr { offset, .. } => *offset,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// The token vector must be terminated by an `End` token, as produced by
    /// `lexer::tokenize`.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    fn advance(&mut self) {
        // Never move past the trailing End token.
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.current().clone();
        if token.kind != expected {
            return Err(ParseError::Expected {
                expected,
                found: token.kind,
                offset: token.offset,
            });
        }
        self.advance();
        Ok(token)
    }

    /// Parse instructions until the current token is the end marker. At least
    /// one instruction is attempted, so an immediately-ended stream is a
    /// parse error rather than an empty program.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut instrs = Vec::new();
        loop {
            instrs.push(self.parse_instr()?);
            if self.current().kind == TokenKind::End {
                break;
            }
        }
        Ok(Program { instrs })
    }

    fn parse_instr(&mut self) -> Result<Instr, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Ident => self.parse_assign(),
            TokenKind::If => self.parse_if(),
            TokenKind::Goto => self.parse_goto(),
            TokenKind::Output => self.parse_output(),
            TokenKind::Label => self.parse_label(),
            found => Err(ParseError::UnexpectedInstr {
                found,
                offset: token.offset,
            }),
        }
    }

    fn parse_assign(&mut self) -> Result<Instr, ParseError> {
        let ident = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Equal)?;
        let expr = self.parse_expr()?;
        Ok(Instr::Assign {
            ident: ident.text,
            expr,
        })
    }

    fn parse_if(&mut self) -> Result<Instr, ParseError> {
        self.expect(TokenKind::If)?;
        let rel = self.parse_rel()?;
        self.expect(TokenKind::Then)?;
        // The conditional governs exactly one instruction, not a block.
        let instr = self.parse_instr()?;
        Ok(Instr::If {
            rel,
            instr: Box::new(instr),
        })
    }

    fn parse_goto(&mut self) -> Result<Instr, ParseError> {
        self.expect(TokenKind::Goto)?;
        let label = self.expect(TokenKind::Label)?;
        Ok(Instr::Goto { label: label.text })
    }

    fn parse_output(&mut self) -> Result<Instr, ParseError> {
        self.expect(TokenKind::Output)?;
        let term = self.parse_term()?;
        Ok(Instr::Output { term })
    }

    fn parse_label(&mut self) -> Result<Instr, ParseError> {
        let token = self.expect(TokenKind::Label)?;
        Ok(Instr::Label { name: token.text })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_term()?;
        let expr = match self.current().kind {
            TokenKind::Plus => {
                self.advance();
                let rhs = self.parse_term()?;
                Expr::Plus { lhs, rhs }
            }
            TokenKind::Minus => {
                self.advance();
                let rhs = self.parse_term()?;
                Expr::Minus { lhs, rhs }
            }
            TokenKind::Mul => {
                self.advance();
                let rhs = self.parse_term()?;
                Expr::Mul { lhs, rhs }
            }
            _ => Expr::Single { term: lhs },
        };
        Ok(expr)
    }

    fn parse_rel(&mut self) -> Result<Rel, ParseError> {
        let lhs = self.parse_term()?;
        let token = self.current();
        let kind = token.kind;
        let offset = token.offset;
        let rel = match kind {
            TokenKind::LessThan => {
                self.advance();
                let rhs = self.parse_term()?;
                Rel::LessThan { lhs, rhs }
            }
            TokenKind::LessThanEqual => {
                self.advance();
                let rhs = self.parse_term()?;
                Rel::LessThanEqual { lhs, rhs }
            }
            TokenKind::DoubleEqual => {
                self.advance();
                let rhs = self.parse_term()?;
                Rel::Equal { lhs, rhs }
            }
            found => return Err(ParseError::ExpectedRel { found, offset }),
        };
        Ok(rel)
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let token = self.current().clone();
        let term = match token.kind {
            TokenKind::Input => Term::Input,
            TokenKind::Int => Term::Int(token.text),
            TokenKind::Ident => Term::Ident(token.text),
            found => {
                return Err(ParseError::ExpectedTerm {
                    found,
                    offset: token.offset,
                })
            }
        };
        self.advance();
        Ok(term)
    }
}
