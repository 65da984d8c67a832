use crate::ast::{Block, BlockKind, Program};
use crate::compiler::generators::{expression, statement};
use crate::compiler::globals::GlobalTable;
use crate::compiler::guard::TypeGuard;
use crate::compiler::runtime::Runtime;
use crate::compiler::values::{CompiledValue, SlotLayout};
use crate::tagged_slot::TypeTag;
use inkwell::builder::{Builder, BuilderError};
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::IntValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Block `{block}` is missing required field `{field}`")]
    MissingField { block: String, field: &'static str },
    #[error("Block `{block}` has malformed literal {text:?}")]
    MalformedLiteral { block: String, text: String },
    #[error("Undefined variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
    #[error("Block `{block}` has no operand in `{slot}`")]
    EmptyOperand { block: String, slot: &'static str },
    #[error("Block `{block}` does not accept a {found} operand")]
    TypeMismatch { block: String, found: &'static str },
    #[error("Block `{0}` is a statement and produces no value")]
    StatementAsValue(String),
    #[error("LLVM builder error: {0}")]
    Builder(#[from] BuilderError),
    #[error("LLVM intrinsic {0} is not available")]
    MissingIntrinsic(&'static str),
    #[error("LLVM module verification failed: {0}")]
    ModuleVerification(String),
}

impl CompileError {
    /// The block type the error was raised for, if it is tied to one.
    pub fn block_type(&self) -> Option<&str> {
        match self {
            CompileError::MissingField { block, .. }
            | CompileError::MalformedLiteral { block, .. }
            | CompileError::EmptyOperand { block, .. }
            | CompileError::TypeMismatch { block, .. } => Some(block),
            CompileError::UnknownBlockType(block) | CompileError::StatementAsValue(block) => {
                Some(block)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    pub module_name: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            module_name: "blockyllvm".to_string(),
        }
    }
}

/// Translates one block program into one LLVM module with an `i32 main()`.
pub struct Compiler<'ctx> {
    pub(crate) context: &'ctx Context,
    pub(crate) builder: Builder<'ctx>,
    pub(crate) module: Module<'ctx>,
    pub(crate) layout: SlotLayout<'ctx>,
    pub(crate) globals: GlobalTable<'ctx>,
    pub(crate) runtime: Runtime<'ctx>,
    pub(crate) guard: TypeGuard<'ctx>,
}

impl<'ctx> Compiler<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self::with_options(context, &CompilerOptions::default())
    }

    pub fn with_options(context: &'ctx Context, options: &CompilerOptions) -> Self {
        let builder = context.create_builder();
        let module = context.create_module(&options.module_name);

        let main_fn_type = context.i32_type().fn_type(&[], false);
        let main_fn = module.add_function("main", main_fn_type, None);
        let entry = context.append_basic_block(main_fn, "entry");
        let guard = TypeGuard::new(context, main_fn);
        builder.position_at_end(entry);

        Self {
            context,
            builder,
            module,
            layout: SlotLayout::new(context),
            globals: GlobalTable::new(),
            runtime: Runtime::new(context),
            guard,
        }
    }

    /// Compiles the program and returns the verified module as LLVM IR text.
    pub fn compile_program(self, program: &Program) -> Result<String, CompileError> {
        let module = self.compile_module(program)?;
        Ok(module.print_to_string().to_string())
    }

    /// Compiles the program into a verified module.
    pub fn compile_module(mut self, program: &Program) -> Result<Module<'ctx>, CompileError> {
        self.globals.declare_all(
            &self.module,
            self.layout.struct_type(),
            program.declarations(),
        )?;

        for block in program.top_level_blocks() {
            self.compile_chain(block)?;
        }

        log::debug!(
            "emitted {} runtime type check(s), trap block present: {}",
            self.guard.check_count(),
            self.guard.has_trap()
        );
        self.guard
            .finish(self.context, &self.builder, &self.module, &mut self.runtime)?;

        self.module
            .verify()
            .map_err(|e| CompileError::ModuleVerification(e.to_string()))?;
        Ok(self.module)
    }

    /// Compiles `block` and every block after it on its `next` chain.
    pub(crate) fn compile_chain(&mut self, block: &Block) -> Result<(), CompileError> {
        for statement in block.chain() {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, block: &Block) -> Result<(), CompileError> {
        match &block.kind {
            BlockKind::VariablesSet => statement::compile_variable_set(self, block),
            BlockKind::TextPrint => statement::compile_text_print(self, block),
            BlockKind::LogicBoolean
            | BlockKind::MathNumber
            | BlockKind::MathConstant
            | BlockKind::Text
            | BlockKind::VariablesGet
            | BlockKind::LogicNegate => statement::compile_expr_stmt(self, block),
            BlockKind::Unrecognized(name) => Err(CompileError::UnknownBlockType(name.clone())),
        }
    }

    pub(crate) fn compile_expression(
        &mut self,
        block: &Block,
    ) -> Result<CompiledValue<'ctx>, CompileError> {
        match &block.kind {
            BlockKind::LogicBoolean => expression::compile_logic_boolean(self, block),
            BlockKind::MathNumber => expression::compile_math_number(self, block),
            BlockKind::MathConstant => expression::compile_math_constant(self, block),
            BlockKind::Text => expression::compile_text(self, block),
            BlockKind::VariablesGet => expression::compile_variable_get(self, block),
            BlockKind::LogicNegate => expression::compile_logic_negate(self, block),
            BlockKind::VariablesSet | BlockKind::TextPrint => {
                Err(CompileError::StatementAsValue(block.kind.as_str().to_string()))
            }
            BlockKind::Unrecognized(name) => Err(CompileError::UnknownBlockType(name.clone())),
        }
    }

    /// Emits a runtime check that `tag` equals `expected`, trapping otherwise.
    pub(crate) fn enforce_tag(
        &mut self,
        tag: IntValue<'ctx>,
        expected: TypeTag,
    ) -> Result<(), CompileError> {
        self.guard
            .enforce(self.context, &self.builder, tag, expected)?;
        Ok(())
    }
}
