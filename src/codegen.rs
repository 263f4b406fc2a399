//! Code generation: lower the instruction list into fasm-syntax x86-64
//! assembly for a Linux ELF64 executable that does its own I/O via syscalls.
//!
//! One forward pass, co-indexed with the slot table. The accumulator is
//! `rax`; binary operators evaluate the left term first, park it in `r12`,
//! evaluate the right term, then combine left (`r12`) with right (`rax`) so
//! non-commutative operators keep left-then-right ordering. Relation results
//! are normalized to exactly 0 or 1 before they leave the accumulator.

use crate::ast::{Expr, Instr, Program, Rel, Term};
use crate::scope::{Scope, WORD_SIZE};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeGenError {
    #[error("cannot find ident in scope: {0}")]
    UndefinedVariable(String),
}

/// Emit the complete assembly text for a collected program. Runs only after
/// `Scope::collect` has succeeded, so nothing is written on a failing
/// compilation.
pub fn generate(program: &Program, scope: &Scope) -> Result<String, CodeGenError> {
    let mut gen = Generator {
        scope,
        asm: String::new(),
        if_count: 0,
    };
    gen.emit_program(program)?;
    Ok(gen.asm)
}

struct Generator<'a> {
    scope: &'a Scope,
    asm: String,
    /// Monotonic counter for synthesized `.endif{n}` labels. User labels
    /// cannot collide with these: identifiers never contain digits.
    if_count: usize,
}

impl Generator<'_> {
    fn line(&mut self, line: &str) {
        self.asm.push_str(line);
        self.asm.push('\n');
    }

    fn slot_offset(&self, ident: &str) -> Result<usize, CodeGenError> {
        let slot = self
            .scope
            .slot(ident)
            .ok_or_else(|| CodeGenError::UndefinedVariable(ident.to_string()))?;
        Ok(slot * WORD_SIZE + WORD_SIZE)
    }

    fn emit_program(&mut self, program: &Program) -> Result<(), CodeGenError> {
        self.line("format ELF64 executable");
        self.line("LINE_MAX equ 1024");
        self.line("segment readable executable");
        self.line("include \"runtime/lib.asm\"");
        self.line("entry _start");
        self.line("_start:");
        self.line("    mov rbp, rsp");
        self.line(&format!("    sub rsp, {}", self.scope.frame_size()));

        for instr in &program.instrs {
            self.emit_instr(instr)?;
        }

        self.line(&format!("    add rsp, {}", self.scope.frame_size()));

        // exit(0)
        self.line("    mov rax, 60");
        self.line("    mov rdi, 0");
        self.line("    syscall");

        self.line("segment readable writeable");
        self.line("newline db 0xa");
        self.line("line rb LINE_MAX");
        Ok(())
    }

    fn emit_instr(&mut self, instr: &Instr) -> Result<(), CodeGenError> {
        match instr {
            Instr::Assign { ident, expr } => {
                self.emit_expr(expr)?;
                let offset = self.slot_offset(ident)?;
                self.line(&format!(
                    "    mov qword [rbp - {offset}], rax ; Store in `{ident}`"
                ));
            }
            Instr::If { rel, instr } => {
                self.emit_rel(rel)?;
                let suf = self.if_count;
                self.if_count += 1;
                self.line("    test rax, rax");
                self.line(&format!("    jz .endif{suf}"));
                self.emit_instr(instr)?;
                self.line(&format!(".endif{suf}:"));
            }
            Instr::Goto { label } => {
                self.line(&format!("    jmp .{label}"));
            }
            Instr::Output { term } => {
                self.emit_term(term)?;
                self.line("    mov rdi, 1"); // stdout
                self.line("    mov rsi, rax");
                self.line("    call write_uint");
                self.line("    write 1, newline, 1");
            }
            Instr::Label { name } => {
                self.line(&format!(".{name}:"));
            }
        }
        Ok(())
    }

    fn emit_rel(&mut self, rel: &Rel) -> Result<(), CodeGenError> {
        let (lhs, rhs, setcc) = match rel {
            Rel::LessThan { lhs, rhs } => (lhs, rhs, "setl"),
            Rel::LessThanEqual { lhs, rhs } => (lhs, rhs, "setle"),
            Rel::Equal { lhs, rhs } => (lhs, rhs, "sete"),
        };
        self.emit_term(lhs)?;
        self.line("    mov r12, rax");
        self.emit_term(rhs)?;
        self.line("    cmp r12, rax");
        self.line(&format!("    {setcc} al"));
        self.line("    and al, 1");
        self.line("    movzx rax, al");
        Ok(())
    }

    fn emit_expr(&mut self, expr: &Expr) -> Result<(), CodeGenError> {
        let (lhs, rhs, op) = match expr {
            Expr::Single { term } => return self.emit_term(term),
            Expr::Plus { lhs, rhs } => (lhs, rhs, "add"),
            Expr::Minus { lhs, rhs } => (lhs, rhs, "sub"),
            Expr::Mul { lhs, rhs } => (lhs, rhs, "imul"),
        };
        self.emit_term(lhs)?;
        self.line("    mov r12, rax");
        self.emit_term(rhs)?;
        self.line(&format!("    {op} r12, rax"));
        self.line("    mov rax, r12");
        Ok(())
    }

    fn emit_term(&mut self, term: &Term) -> Result<(), CodeGenError> {
        match term {
            Term::Input => {
                self.line("    read 0, line, LINE_MAX");
                self.line("    mov rdi, line");
                self.line("    call strlen");
                self.line("    mov rdi, line");
                self.line("    mov rsi, rax");
                self.line("    call parse_uint");
            }
            Term::Int(val) => {
                self.line(&format!("    mov rax, {val}"));
            }
            Term::Ident(name) => {
                let offset = self.slot_offset(name)?;
                self.line(&format!(
                    "    mov rax, qword [rbp - {offset}] ; Load `{name}`"
                ));
            }
        }
        Ok(())
    }
}
