use std::env;
use std::fs;
use std::process::ExitCode;

use alexc::codegen;
use alexc::error;
use alexc::lexer;
use alexc::parser::Parser;
use alexc::scope::Scope;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: alexc <source-file> [--dump]");
        return ExitCode::FAILURE;
    };
    let dump = args.next().as_deref() == Some("--dump");

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let tokens = lexer::tokenize(&source);

    if dump {
        eprintln!("TOKENS:");
        for token in &tokens {
            eprintln!("{token}");
        }
        eprintln!();
    }

    let program = match Parser::new(tokens).parse_program() {
        Ok(program) => program,
        Err(e) => {
            error::display_parse_error(&source, &path, &e);
            return ExitCode::FAILURE;
        }
    };

    if dump {
        eprintln!("INSTRS:");
        for instr in &program.instrs {
            eprintln!("{instr:?}");
        }
        return ExitCode::SUCCESS;
    }

    let scope = match Scope::collect(&program) {
        Ok(scope) => scope,
        Err(e) => {
            error::display_scope_error(&source, &path, &e);
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Scope: {:?}", scope.idents());

    match codegen::generate(&program, &scope) {
        Ok(asm) => {
            print!("{asm}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error::display_codegen_error(&source, &path, &e);
            ExitCode::FAILURE
        }
    }
}
