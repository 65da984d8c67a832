//! Runtime Type Enforcement
//!
//! Owns the control-flow skeleton of the entry function: one `exit` block that
//! every path ends in, and at most one `trap` block shared by every tag check.
//!
//! ```text
//! entry -> stmt -> [type_ok] -> stmt -> ... -> exit
//!            \_______ trap (llvm.trap) _______/
//! ```

use crate::codegen::CompileError;
use crate::compiler::runtime::{Runtime, RuntimeFn};
use crate::tagged_slot::TypeTag;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::{Builder, BuilderError};
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{FunctionValue, IntValue};
use inkwell::IntPredicate;

pub struct TypeGuard<'ctx> {
    function: FunctionValue<'ctx>,
    exit: BasicBlock<'ctx>,
    trap: Option<BasicBlock<'ctx>>,
    checks: usize,
}

impl<'ctx> TypeGuard<'ctx> {
    /// Appends the shared `exit` block to `function`.
    pub fn new(context: &'ctx Context, function: FunctionValue<'ctx>) -> Self {
        let exit = context.append_basic_block(function, "exit");
        Self {
            function,
            exit,
            trap: None,
            checks: 0,
        }
    }

    /// The shared trap block, created on first request.
    pub fn trap_block(&mut self, context: &'ctx Context) -> BasicBlock<'ctx> {
        let function = self.function;
        *self.trap.get_or_insert_with(|| {
            log::debug!("creating shared trap block");
            context.append_basic_block(function, "trap")
        })
    }

    pub fn has_trap(&self) -> bool {
        self.trap.is_some()
    }

    /// Number of runtime tag checks emitted so far.
    pub fn check_count(&self) -> usize {
        self.checks
    }

    /// Branches to the trap block unless `tag == expected`, and leaves the
    /// builder positioned in a fresh success block.
    pub fn enforce(
        &mut self,
        context: &'ctx Context,
        builder: &Builder<'ctx>,
        tag: IntValue<'ctx>,
        expected: TypeTag,
    ) -> Result<(), BuilderError> {
        let expected_value = context.i8_type().const_int(expected.as_u8() as u64, false);
        let mismatch =
            builder.build_int_compare(IntPredicate::NE, tag, expected_value, "tag_mismatch")?;
        let trap = self.trap_block(context);
        let success = context.append_basic_block(self.function, "type_ok");
        builder.build_conditional_branch(mismatch, trap, success)?;
        builder.position_at_end(success);
        self.checks += 1;
        Ok(())
    }

    /// Closes the function: the current block falls through to `exit`, the
    /// trap block (if any) traps and then joins `exit`, and `exit` returns 0.
    pub fn finish(
        self,
        context: &'ctx Context,
        builder: &Builder<'ctx>,
        module: &Module<'ctx>,
        runtime: &mut Runtime<'ctx>,
    ) -> Result<(), CompileError> {
        builder.build_unconditional_branch(self.exit)?;

        if let Some(trap) = self.trap {
            let trap_fn = runtime.get(module, RuntimeFn::Trap)?;
            builder.position_at_end(trap);
            builder.build_call(trap_fn, &[], "")?;
            builder.build_unconditional_branch(self.exit)?;
        }

        builder.position_at_end(self.exit);
        builder.build_return(Some(&context.i32_type().const_zero()))?;
        Ok(())
    }
}
