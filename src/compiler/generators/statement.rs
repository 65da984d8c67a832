//! Statement Compilation Module
//!
//! Side-effecting blocks. Each function takes `&mut Compiler`, emits the
//! statement at the current insertion point and produces no value.
//! Sequencing along `next` links is done by `Compiler::compile_chain`.
//!
//! ## Blocks
//! - `variables_set`: stores tag and payload together, or bulk-copies a slot
//! - `text_print`: calls the print routine matching the value's kind

use crate::ast::Block;
use crate::codegen::{CompileError, Compiler};
use crate::compiler::generators::expression::resolve_variable;
use crate::compiler::runtime::RuntimeFn;
use crate::compiler::values::CompiledValue;
use inkwell::values::BasicMetadataValueEnum;

/// Compiles an assignment: `set VAR to VALUE`
pub fn compile_variable_set<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<(), CompileError> {
    let destination = resolve_variable(compiler, block)?;
    // Shadows never satisfy an assignment.
    let source = block
        .child_value("VALUE")
        .ok_or_else(|| CompileError::EmptyOperand {
            block: block.kind.as_str().to_string(),
            slot: "VALUE",
        })?;

    match compiler.compile_expression(source)? {
        CompiledValue::Slot(source_slot) => {
            let copy = compiler.runtime.get(&compiler.module, RuntimeFn::CopyGlobal)?;
            compiler.builder.build_call(
                copy,
                &[destination.into(), source_slot.into()],
                "copy_global",
            )?;
        }
        CompiledValue::Double(value) => {
            compiler
                .layout
                .store_double(&compiler.builder, destination, value)?;
        }
        CompiledValue::Integer(value) => {
            compiler
                .layout
                .store_integer(&compiler.builder, destination, value)?;
        }
        CompiledValue::Text(text) => {
            compiler
                .layout
                .store_static_text(&compiler.builder, destination, text)?;
        }
    }
    Ok(())
}

/// Compiles a print statement: `print TEXT`
pub fn compile_text_print<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<(), CompileError> {
    let argument = block
        .child_value("TEXT")
        .or_else(|| block.shadow_value("TEXT"))
        .ok_or_else(|| CompileError::EmptyOperand {
            block: block.kind.as_str().to_string(),
            slot: "TEXT",
        })?;

    let (function, value): (RuntimeFn, BasicMetadataValueEnum<'ctx>) =
        match compiler.compile_expression(argument)? {
            CompiledValue::Slot(slot) => (RuntimeFn::PrintGlobal, slot.into()),
            CompiledValue::Double(value) => (RuntimeFn::PrintDouble, value.into()),
            CompiledValue::Integer(value) => (RuntimeFn::PrintInteger, value.into()),
            CompiledValue::Text(text) => (RuntimeFn::PrintCharArray, text.into()),
        };
    let print = compiler.runtime.get(&compiler.module, function)?;
    compiler.builder.build_call(print, &[value], "print")?;
    Ok(())
}

/// Compiles a value block used as a statement: the value is computed and
/// discarded.
pub fn compile_expr_stmt<'ctx>(
    compiler: &mut Compiler<'ctx>,
    block: &Block,
) -> Result<(), CompileError> {
    compiler.compile_expression(block)?;
    Ok(())
}
