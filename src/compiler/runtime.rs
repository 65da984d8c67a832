//! Runtime Support Functions
//!
//! Declarations for the runtime support ABI the generated program calls into.
//! Each function is declared on first use and looked up from the registry
//! afterwards, so a module never carries duplicate declarations.
//!
//! ## ABI
//! - `_printInteger(i64)`
//! - `_printDouble(double)`
//! - `_printConstString(ptr)`
//! - `_printGlobal(ptr)`: dispatches on the slot's tag at runtime
//! - `_globalVariableCopy(ptr dst, ptr src)`: copies every slot field
//! - `llvm.trap()`

use crate::codegen::CompileError;
use inkwell::context::Context;
use inkwell::intrinsics::Intrinsic;
use inkwell::module::{Linkage, Module};
use inkwell::values::FunctionValue;
use inkwell::AddressSpace;
use std::collections::HashMap;

/// Logical runtime operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeFn {
    PrintInteger,
    PrintDouble,
    PrintCharArray,
    PrintGlobal,
    CopyGlobal,
    Trap,
}

impl RuntimeFn {
    pub fn symbol(self) -> &'static str {
        match self {
            RuntimeFn::PrintInteger => "_printInteger",
            RuntimeFn::PrintDouble => "_printDouble",
            RuntimeFn::PrintCharArray => "_printConstString",
            RuntimeFn::PrintGlobal => "_printGlobal",
            RuntimeFn::CopyGlobal => "_globalVariableCopy",
            RuntimeFn::Trap => "llvm.trap",
        }
    }
}

/// Registry of declared runtime functions
pub struct Runtime<'ctx> {
    context: &'ctx Context,
    declared: HashMap<RuntimeFn, FunctionValue<'ctx>>,
}

impl<'ctx> Runtime<'ctx> {
    /// Creates a new Runtime manager
    pub fn new(context: &'ctx Context) -> Self {
        Self {
            context,
            declared: HashMap::new(),
        }
    }

    /// Returns the declaration for `function`, declaring it on first use.
    pub fn get(
        &mut self,
        module: &Module<'ctx>,
        function: RuntimeFn,
    ) -> Result<FunctionValue<'ctx>, CompileError> {
        if let Some(declared) = self.declared.get(&function) {
            return Ok(*declared);
        }
        let declared = self.declare(module, function)?;
        log::debug!("declared runtime function {}", function.symbol());
        self.declared.insert(function, declared);
        Ok(declared)
    }

    fn declare(
        &self,
        module: &Module<'ctx>,
        function: RuntimeFn,
    ) -> Result<FunctionValue<'ctx>, CompileError> {
        let void_type = self.context.void_type();
        let ptr_type = self.context.ptr_type(AddressSpace::default());
        let fn_type = match function {
            RuntimeFn::PrintInteger => void_type.fn_type(&[self.context.i64_type().into()], false),
            RuntimeFn::PrintDouble => void_type.fn_type(&[self.context.f64_type().into()], false),
            RuntimeFn::PrintCharArray | RuntimeFn::PrintGlobal => {
                void_type.fn_type(&[ptr_type.into()], false)
            }
            RuntimeFn::CopyGlobal => void_type.fn_type(&[ptr_type.into(), ptr_type.into()], false),
            RuntimeFn::Trap => {
                // The intrinsic declaration carries noreturn/nounwind itself.
                return Intrinsic::find(function.symbol())
                    .and_then(|intrinsic| intrinsic.get_declaration(module, &[]))
                    .ok_or(CompileError::MissingIntrinsic(function.symbol()));
            }
        };
        Ok(module.add_function(function.symbol(), fn_type, Some(Linkage::External)))
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }
}
