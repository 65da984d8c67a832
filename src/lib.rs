pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod error;
pub mod parser;
pub mod tagged_slot;
