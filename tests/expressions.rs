use blocky_compiler::codegen::{CompileError, Compiler};
use blocky_compiler::*;
use inkwell::context::Context;

fn compile(blocks: &str) -> Result<String, CompileError> {
    let source = format!(
        r#"<xml xmlns="https://developers.google.com/blockly/xml">
    <variables>
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

fn print_of(value: &str) -> String {
    format!(
        r#"<block type="text_print" id="print">
        <value name="TEXT">{}</value>
    </block>"#,
        value
    )
}

#[test]
fn test_boolean_true_is_integer_one() {
    let llvm_ir = compile(&print_of(
        r#"<block type="logic_boolean"><field name="BOOL">TRUE</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 1)"));
}

#[test]
fn test_boolean_other_text_is_integer_zero() {
    let llvm_ir = compile(&print_of(
        r#"<block type="logic_boolean"><field name="BOOL">FALSE</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 0)"));
}

#[test]
fn test_integral_number_is_integer() {
    let llvm_ir = compile(&print_of(
        r#"<block type="math_number"><field name="NUM">123</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 123)"));
    assert!(!llvm_ir.contains("@_printDouble"));
}

#[test]
fn test_integral_decimal_is_integer() {
    let llvm_ir = compile(&print_of(
        r#"<block type="math_number"><field name="NUM">123.0</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 123)"));
}

#[test]
fn test_integer_limits_are_exact() {
    let llvm_ir = compile(&print_of(
        r#"<block type="math_number"><field name="NUM">9223372036854775807</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 9223372036854775807)"));

    let llvm_ir = compile(&print_of(
        r#"<block type="math_number"><field name="NUM">9007199254740993</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 9007199254740993)"));
}

#[test]
fn test_fractional_number_is_double() {
    let llvm_ir = compile(&print_of(
        r#"<block type="math_number"><field name="NUM">123.1</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printDouble(double"));
    assert!(llvm_ir.contains("declare void @_printDouble(double)"));
    assert!(!llvm_ir.contains("@_printInteger"));
}

#[test]
fn test_pi_constant_is_double() {
    let llvm_ir = compile(&print_of(
        r#"<block type="math_constant"><field name="CONSTANT">PI</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printDouble(double 0x400921FB54442D18)"));
}

#[test]
fn test_text_literal_is_nul_terminated_constant() {
    let llvm_ir = compile(&print_of(
        r#"<block type="text"><field name="TEXT">abcdefg</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains(r#"c"abcdefg\00""#));
    assert!(llvm_ir.contains("call void @_printConstString(ptr @text)"));
}

#[test]
fn test_whitespace_text_literal_is_kept() {
    let llvm_ir = compile(&print_of(
        r#"<block type="text"><field name="TEXT">   </field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains(r#"c"   \00""#));
}

#[test]
fn test_variable_get_references_slot() {
    let llvm_ir = compile(&print_of(
        r#"<block type="variables_get"><field name="VAR" id="num_id">num</field></block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printGlobal(ptr @_G_ID_num_id)"));
}

#[test]
fn test_negate_of_true_folds_at_translation_time() {
    let llvm_ir = compile(&print_of(
        r#"<block type="logic_negate">
            <value name="BOOL">
                <block type="logic_boolean"><field name="BOOL">TRUE</field></block>
            </value>
        </block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 -1)"));
    assert!(!llvm_ir.contains("llvm.trap"));
    assert!(!llvm_ir.lines().any(|line| line.starts_with("trap:")));
}

#[test]
fn test_double_negation_of_number() {
    let llvm_ir = compile(&print_of(
        r#"<block type="logic_negate">
            <value name="BOOL">
                <block type="logic_negate">
                    <value name="BOOL">
                        <block type="math_number"><field name="NUM">5</field></block>
                    </value>
                </block>
            </value>
        </block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 5)"));
}

#[test]
fn test_negate_of_variable_is_tag_checked() {
    let llvm_ir = compile(&print_of(
        r#"<block type="logic_negate">
            <value name="BOOL">
                <block type="variables_get"><field name="VAR" id="num_id">num</field></block>
            </value>
        </block>"#,
    ))
    .unwrap();
    assert!(llvm_ir.contains("icmp ne i8"));
    assert!(llvm_ir.contains("label %trap, label %type_ok"));
    assert!(llvm_ir.contains("call void @llvm.trap()"));
    assert!(llvm_ir.contains("sub i64 0, %int_payload"));
    assert!(llvm_ir.contains("call void @_printInteger(i64 %neg)"));
}

#[test]
fn test_negate_without_operand_defaults_to_one() {
    let llvm_ir = compile(&print_of(r#"<block type="logic_negate"></block>"#)).unwrap();
    assert!(llvm_ir.contains("call void @_printInteger(i64 1)"));
}

#[test]
fn test_value_block_as_statement_is_discarded() {
    let llvm_ir = compile(
        r#"<block type="variables_get"><field name="VAR" id="num_id">num</field></block>"#,
    )
    .unwrap();
    assert!(!llvm_ir.contains("call void"));
    assert!(llvm_ir.contains("define i32 @main()"));
}
