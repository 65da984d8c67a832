use blocky_compiler::codegen::{CompileError, Compiler};
use blocky_compiler::*;
use inkwell::context::Context;

const NUM: &str = "_G_ID_num_id";
const X: &str = "_G_ID_x_id";

fn compile(blocks: &str) -> Result<String, CompileError> {
    let source = format!(
        r#"<xml xmlns="https://developers.google.com/blockly/xml">
    <variables>
        <variable id="x_id">x</variable>
        <variable id="num_id">num</variable>
    </variables>
    {}
</xml>"#,
        blocks
    );
    let program = parser::parse_program(&source).unwrap();
    let context = Context::create();
    let compiler = Compiler::new(&context);
    compiler.compile_program(&program)
}

fn set_num(value: &str) -> String {
    format!(
        r#"<block type="variables_set">
        <field name="VAR" id="num_id">num</field>
        <value name="VALUE">{}</value>
    </block>"#,
        value
    )
}

#[test]
fn test_globals_are_private_zeroed_slots() {
    let llvm_ir = compile("").unwrap();
    assert!(llvm_ir.contains(&format!(
        "@{} = private global {{ i64, double, ptr, i8 }} zeroinitializer",
        NUM
    )));
    assert!(llvm_ir.contains(&format!(
        "@{} = private global {{ i64, double, ptr, i8 }} zeroinitializer",
        X
    )));
}

#[test]
fn test_assign_integer_stores_tag_and_payload() {
    let llvm_ir = compile(&set_num(
        r#"<block type="math_number"><field name="NUM">123</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("store i8 0"));
    assert!(llvm_ir.contains("store i64 123"));
}

#[test]
fn test_assign_double_stores_double_tag() {
    let llvm_ir = compile(&set_num(
        r#"<block type="math_number"><field name="NUM">123.1</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("store i8 1"));
    assert!(llvm_ir.contains("store double"));
}

#[test]
fn test_assign_text_stores_static_text_tag() {
    let llvm_ir = compile(&set_num(
        r#"<block type="text"><field name="TEXT">abcdefg</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("store i8 2"));
    assert!(llvm_ir.contains("store ptr @text"));
    assert!(!llvm_ir.contains("store i8 3"));
}

#[test]
fn test_assign_from_variable_bulk_copies() {
    let llvm_ir = compile(&set_num(
        r#"<block type="variables_get"><field name="VAR" id="x_id">x</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains(&format!(
        "call void @_globalVariableCopy(ptr @{}, ptr @{})",
        NUM, X
    )));
    // No tag is read or checked for a copy.
    assert!(!llvm_ir.contains("icmp"));
}

#[test]
fn test_copy_helper_is_declared_once() {
    let copy = set_num(
        r#"<block type="variables_get"><field name="VAR" id="x_id">x</field></block>"#,
    );
    let llvm_ir = compile(&format!(
        r#"<block type="variables_set">
        <field name="VAR" id="x_id">x</field>
        <value name="VALUE">
            <block type="variables_get"><field name="VAR" id="num_id">num</field></block>
        </value>
        <next>{}</next>
    </block>"#,
        copy
    ))
    .unwrap();
    assert_eq!(llvm_ir.matches("declare void @_globalVariableCopy(ptr, ptr)").count(), 1);
    assert_eq!(llvm_ir.matches("call void @_globalVariableCopy").count(), 2);
    assert!(!llvm_ir.contains("_globalVariableCopy.1"));
}

#[test]
fn test_print_prefers_value_over_shadow() {
    let llvm_ir = compile(
        r#"<block type="text_print">
        <value name="TEXT">
            <shadow type="text"><field name="TEXT">abc</field></shadow>
            <block type="text"><field name="TEXT">abcdefg</field></block>
        </value>
    </block>"#,
    )
    .unwrap();
    assert!(llvm_ir.contains(r#"c"abcdefg\00""#));
    assert!(!llvm_ir.contains(r#"c"abc\00""#));
}

#[test]
fn test_print_falls_back_to_shadow() {
    let llvm_ir = compile(
        r#"<block type="text_print">
        <value name="TEXT">
            <shadow type="text"><field name="TEXT">abc</field></shadow>
        </value>
    </block>"#,
    )
    .unwrap();
    assert!(llvm_ir.contains(r#"c"abc\00""#));
    assert!(llvm_ir.contains("call void @_printConstString(ptr @text)"));
}

#[test]
fn test_print_declares_only_used_helpers() {
    let llvm_ir = compile(
        r#"<block type="text_print">
        <value name="TEXT">
            <block type="math_number"><field name="NUM">1</field></block>
        </value>
    </block>"#,
    )
    .unwrap();
    assert!(llvm_ir.contains("declare void @_printInteger(i64)"));
    assert!(!llvm_ir.contains("@_printDouble"));
    assert!(!llvm_ir.contains("@_printConstString"));
    assert!(!llvm_ir.contains("@_printGlobal"));
}

#[test]
fn test_next_chain_compiles_in_program_order() {
    let llvm_ir = compile(
        r#"<block type="text_print">
        <value name="TEXT"><block type="math_number"><field name="NUM">1</field></block></value>
        <next>
            <block type="text_print">
                <value name="TEXT"><block type="math_number"><field name="NUM">2</field></block></value>
                <next>
                    <block type="text_print">
                        <value name="TEXT"><block type="math_number"><field name="NUM">3</field></block></value>
                    </block>
                </next>
            </block>
        </next>
    </block>"#,
    )
    .unwrap();
    let first = llvm_ir.find("@_printInteger(i64 1)").unwrap();
    let second = llvm_ir.find("@_printInteger(i64 2)").unwrap();
    let third = llvm_ir.find("@_printInteger(i64 3)").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_top_level_blocks_compile_in_document_order() {
    let llvm_ir = compile(
        r#"<block type="text_print">
        <value name="TEXT"><block type="text"><field name="TEXT">first</field></block></value>
    </block>
    <block type="text_print">
        <value name="TEXT"><block type="text"><field name="TEXT">second</field></block></value>
    </block>"#,
    )
    .unwrap();
    let first = llvm_ir.find(r#"c"first\00""#).unwrap();
    let second = llvm_ir.find(r#"c"second\00""#).unwrap();
    assert!(first < second);
    assert_eq!(llvm_ir.matches("call void @_printConstString").count(), 2);
}
