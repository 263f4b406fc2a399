use alexc::codegen::generate;
use alexc::lexer::tokenize;
use alexc::parser::Parser;
use alexc::scope::Scope;

fn compile_source(source: &str) -> String {
    let program = Parser::new(tokenize(source)).parse_program().unwrap();
    let scope = Scope::collect(&program).unwrap();
    generate(&program, &scope).unwrap()
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_frame_is_reserved_and_restored_symmetrically() {
    let asm = compile_source("a = 1\nb = 2");
    assert!(asm.contains("    sub rsp, 16\n"), "Frame should be 2 slots");
    assert!(asm.contains("    add rsp, 16\n"), "Frame should be restored");
}

#[test]
fn test_exit_status_zero_via_syscall() {
    let asm = compile_source("x = 1");
    let exit = "    mov rax, 60\n    mov rdi, 0\n    syscall\n";
    assert!(asm.contains(exit), "Program should exit(0) via syscall");
}

#[test]
fn test_data_section_holds_newline_and_line_buffer() {
    let asm = compile_source("x = input\noutput x");
    assert!(asm.contains("segment readable writeable\n"));
    assert!(asm.contains("newline db 0xa\n"));
    assert!(asm.contains("line rb LINE_MAX\n"));
}

#[test]
fn test_assign_stores_at_the_slot_offset() {
    let asm = compile_source("a = 1\nb = 2");
    assert!(asm.contains("    mov qword [rbp - 8], rax ; Store in `a`\n"));
    assert!(asm.contains("    mov qword [rbp - 16], rax ; Store in `b`\n"));
}

#[test]
fn test_variable_loads_from_the_slot_offset() {
    let asm = compile_source("a = 1\nb = 2\noutput b");
    assert!(asm.contains("    mov rax, qword [rbp - 16] ; Load `b`\n"));
}

#[test]
fn test_binary_operators_keep_left_then_right_order() {
    // Left operand goes through r12 so subtraction computes left - right.
    let asm = compile_source("a = 9\nb = 4\nc = a - b");
    let expected = concat!(
        "    mov rax, qword [rbp - 8] ; Load `a`\n",
        "    mov r12, rax\n",
        "    mov rax, qword [rbp - 16] ; Load `b`\n",
        "    sub r12, rax\n",
        "    mov rax, r12\n",
    );
    assert!(asm.contains(expected), "Unexpected subtraction lowering:\n{asm}");
}

#[test]
fn test_full_operator_set_is_lowered() {
    let asm = compile_source(
        "a = 1\nb = 2\nc = a + b\nd = a - b\ne = a * b\n\
         if a < b then output a\nif a <= b then output a\nif a == b then output a",
    );
    for op in ["add r12, rax", "sub r12, rax", "imul r12, rax"] {
        assert!(asm.contains(op), "Missing `{op}`");
    }
    for setcc in ["setl al", "setle al", "sete al"] {
        assert!(asm.contains(setcc), "Missing `{setcc}`");
    }
}

#[test]
fn test_relation_results_are_normalized_to_zero_or_one() {
    let asm = compile_source("a = 1\nif a < 2 then output a");
    let normalize = "    setl al\n    and al, 1\n    movzx rax, al\n";
    assert!(asm.contains(normalize), "Relation should normalize to 0/1");
}

#[test]
fn test_nested_conditionals_get_unique_end_labels() {
    let asm = compile_source("a = input\nif a < 10 then if a < 5 then output a");
    assert_eq!(count_occurrences(&asm, "jz .endif0\n"), 1);
    assert_eq!(count_occurrences(&asm, "jz .endif1\n"), 1);
    assert_eq!(count_occurrences(&asm, ".endif0:\n"), 1);
    assert_eq!(count_occurrences(&asm, ".endif1:\n"), 1);
    // The outer conditional closes after the inner one.
    let inner_end = asm.find(".endif1:").unwrap();
    let outer_end = asm.find(".endif0:").unwrap();
    assert!(inner_end < outer_end);
}

#[test]
fn test_sequential_conditionals_also_get_unique_labels() {
    let asm = compile_source("a = 1\nif a < 2 then output a\nif a < 3 then output a");
    assert_eq!(count_occurrences(&asm, ".endif0:\n"), 1);
    assert_eq!(count_occurrences(&asm, ".endif1:\n"), 1);
}

#[test]
fn test_goto_and_label_lowering() {
    let asm = compile_source(":loop\nx = 1\noutput x\ngoto :loop");
    assert!(asm.contains(".loop:\n"));
    assert!(asm.contains("    jmp .loop\n"));
}

#[test]
fn test_input_calls_the_runtime_parse_routines() {
    let asm = compile_source("x = input\noutput x");
    let read_input = concat!(
        "    read 0, line, LINE_MAX\n",
        "    mov rdi, line\n",
        "    call strlen\n",
        "    mov rdi, line\n",
        "    mov rsi, rax\n",
        "    call parse_uint\n",
    );
    assert!(asm.contains(read_input), "Unexpected input lowering:\n{asm}");
}

#[test]
fn test_output_calls_the_runtime_write_routine() {
    let asm = compile_source("x = 1\noutput x");
    let write_output = concat!(
        "    mov rdi, 1\n",
        "    mov rsi, rax\n",
        "    call write_uint\n",
        "    write 1, newline, 1\n",
    );
    assert!(asm.contains(write_output), "Unexpected output lowering:\n{asm}");
}

#[test]
fn test_generation_is_deterministic() {
    let source = "a = input\nif a < 10 then output a\ngoto :end\n:end";
    assert_eq!(compile_source(source), compile_source(source));
}

#[test]
fn test_assign_and_output_snapshot() {
    insta::assert_snapshot!("assign_and_output", compile_source("x = 1\noutput x"));
}

#[test]
fn test_conditional_output_snapshot() {
    insta::assert_snapshot!(
        "conditional_output",
        compile_source("a = input\nif a < 10 then output a")
    );
}
