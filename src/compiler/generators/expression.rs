//! Expression Compilation Module
//!
//! Value-producing blocks. Each function takes `&mut Compiler` and returns a
//! [`CompiledValue`]; the only IR emitted is what computing the value needs.
//!
//! ## Blocks
//! - `logic_boolean`: integer 1 for `TRUE`, 0 otherwise
//! - `math_number`: integer when the value has no fractional part, else double
//! - `math_constant`: `PI`
//! - `text`: a private NUL-terminated string constant
//! - `variables_get`: a reference to the variable's global slot
//! - `logic_negate`: integer negation, tag-checked at runtime for slot operands

use crate::ast::Block;
use crate::codegen::{CompileError, Compiler};
use crate::compiler::values::CompiledValue;
use crate::tagged_slot::TypeTag;
use inkwell::values::PointerValue;
use num_traits::ToPrimitive;

/// A numeric literal after source-format classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    Integer(i64),
    Double(f64),
}

/// Parses literal text; integral values become integers regardless of how
/// they were written (`123.0` is the integer 123).
pub fn classify_number(text: &str) -> Option<NumberLiteral> {
    let text = text.trim();
    // Plain integers keep full i64 precision; f64 loses it above 2^53.
    if let Ok(value) = text.parse::<i64>() {
        return Some(NumberLiteral::Integer(value));
    }
    let value: f64 = text.parse().ok()?;
    if value.is_nan() {
        return None;
    }
    if value.fract() == 0.0 {
        // Integral but outside i64 has no integer payload to live in.
        return value.to_i64().map(NumberLiteral::Integer);
    }
    Some(NumberLiteral::Double(value))
}

fn malformed(block: &Block, text: &str) -> CompileError {
    CompileError::MalformedLiteral {
        block: block.kind.as_str().to_string(),
        text: text.to_string(),
    }
}

fn missing_field(block: &Block, field: &'static str) -> CompileError {
    CompileError::MissingField {
        block: block.kind.as_str().to_string(),
        field,
    }
}

pub fn compile_logic_boolean<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<CompiledValue<'ctx>, CompileError> {
    let value = u64::from(block.field("BOOL") == Some("TRUE"));
    Ok(CompiledValue::Integer(
        compiler.context.i64_type().const_int(value, false),
    ))
}

pub fn compile_math_number<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<CompiledValue<'ctx>, CompileError> {
    let text = block.field("NUM").ok_or_else(|| missing_field(block, "NUM"))?;
    match classify_number(text).ok_or_else(|| malformed(block, text))? {
        NumberLiteral::Integer(value) => Ok(CompiledValue::Integer(
            compiler.context.i64_type().const_int(value as u64, true),
        )),
        NumberLiteral::Double(value) => Ok(CompiledValue::Double(
            compiler.context.f64_type().const_float(value),
        )),
    }
}

pub fn compile_math_constant<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<CompiledValue<'ctx>, CompileError> {
    let name = block
        .field("CONSTANT")
        .ok_or_else(|| missing_field(block, "CONSTANT"))?;
    match name {
        "PI" => Ok(CompiledValue::Double(
            compiler.context.f64_type().const_float(std::f64::consts::PI),
        )),
        other => Err(malformed(block, other)),
    }
}

pub fn compile_text<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<CompiledValue<'ctx>, CompileError> {
    let text = block
        .field("TEXT")
        .filter(|text| !text.is_empty())
        .ok_or_else(|| CompileError::EmptyOperand {
            block: block.kind.as_str().to_string(),
            slot: "TEXT",
        })?;
    // The constant is NUL-terminated; an embedded NUL would truncate it.
    if text.contains('\0') {
        return Err(malformed(block, text));
    }
    let constant = compiler.builder.build_global_string_ptr(text, "text")?;
    Ok(CompiledValue::Text(constant.as_pointer_value()))
}

/// Resolves the `VAR` field of a variable block to its global slot.
pub fn resolve_variable<'ctx>(
    compiler: &Compiler<'ctx>,
    block: &Block,
) -> Result<PointerValue<'ctx>, CompileError> {
    let id = block
        .field_reference("VAR")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| missing_field(block, "VAR"))?;
    Ok(compiler.globals.lookup(id)?.ptr)
}

pub fn compile_variable_get<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<CompiledValue<'ctx>, CompileError> {
    Ok(CompiledValue::Slot(resolve_variable(compiler, block)?))
}

pub fn compile_logic_negate<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<CompiledValue<'ctx>, CompileError> {
    let Some(operand) = block.child_value("BOOL") else {
        log::warn!(
            "logic_negate {} has no operand, using 1",
            block.id.as_deref().unwrap_or("<anonymous>")
        );
        return Ok(CompiledValue::Integer(
            compiler.context.i64_type().const_int(1, false),
        ));
    };

    match compiler.compile_expression(operand)? {
        CompiledValue::Integer(value) => Ok(CompiledValue::Integer(
            compiler.builder.build_int_neg(value, "neg")?,
        )),
        CompiledValue::Slot(slot) => {
            let tag = compiler.layout.load_tag(&compiler.builder, slot)?;
            compiler.enforce_tag(tag, TypeTag::Integer)?;
            let value = compiler.layout.load_integer(&compiler.builder, slot)?;
            Ok(CompiledValue::Integer(
                compiler.builder.build_int_neg(value, "neg")?,
            ))
        }
        other => Err(CompileError::TypeMismatch {
            block: block.kind.as_str().to_string(),
            found: other.describe(),
        }),
    }
}
