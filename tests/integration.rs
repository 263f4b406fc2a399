use alexc::codegen::generate;
use alexc::lexer::tokenize;
use alexc::parser::Parser;
use alexc::scope::Scope;

fn compile_source(source: &str) -> String {
    let program = Parser::new(tokenize(source)).parse_program().unwrap();
    let scope = Scope::collect(&program).unwrap();
    generate(&program, &scope).unwrap()
}

#[test]
fn test_assign_then_output_compiles() {
    let source = "x = 1\noutput x";
    let program = Parser::new(tokenize(source)).parse_program().unwrap();
    let scope = Scope::collect(&program).unwrap();

    assert_eq!(scope.idents(), vec!["x"], "Slot table should hold exactly `x`");
    assert_eq!(scope.slot("x"), Some(0));
    assert!(generate(&program, &scope).is_ok());
}

#[test]
fn test_conditional_output_emits_one_guarded_block() {
    let asm = compile_source("a = input\nif a < 10 then output a");

    // Exactly one synthesized skip label, reachable from exactly one branch.
    assert_eq!(asm.matches(".endif0").count(), 2, "One jump plus one marker");
    assert_eq!(asm.matches("jz .endif0").count(), 1);

    // The output instruction sits between the branch and its target.
    let branch = asm.find("jz .endif0").unwrap();
    let output = asm.find("call write_uint").unwrap();
    let target = asm.find(".endif0:").unwrap();
    assert!(branch < output && output < target);
}

#[test]
fn test_countdown_loop_via_goto() {
    let source = "n = input\n\
                  :again\n\
                  output n\n\
                  n = n - 1\n\
                  if 0 < n then goto :again";
    let asm = compile_source(source);
    assert!(asm.contains(".again:\n"));
    assert!(asm.contains("    jmp .again\n"));
    assert!(asm.contains("    sub r12, rax\n"));
    assert!(asm.contains("    jz .endif0\n"));
}

#[test]
fn test_whole_language_surface_compiles() {
    let source = "a = input\n\
                  b = a + 1\n\
                  c = b - a\n\
                  d = c * 2\n\
                  if a < b then output a\n\
                  if a <= b then output b\n\
                  if c == d then goto :skip\n\
                  output d\n\
                  :skip\n\
                  output c";
    let program = Parser::new(tokenize(source)).parse_program().unwrap();
    assert_eq!(program.instrs.len(), 10);

    let scope = Scope::collect(&program).unwrap();
    assert_eq!(scope.idents(), vec!["a", "b", "c", "d"]);

    let asm = generate(&program, &scope).unwrap();
    assert!(asm.contains("    sub rsp, 32\n"));
    assert!(asm.contains("    add rsp, 32\n"));
}

#[test]
fn test_same_source_compiles_to_same_assembly() {
    let source = "x = input\ny = x * x\noutput y";
    assert_eq!(compile_source(source), compile_source(source));
}
