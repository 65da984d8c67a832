//! Compiler Module
//!
//! Building blocks of the block-to-LLVM compiler driven by [`crate::codegen::Compiler`].
//!
//! ## Architecture
//! - `values`: compiled values and the tagged slot layout
//! - `globals`: one global slot per declared variable
//! - `runtime`: runtime support function declarations
//! - `guard`: runtime tag checks and the shared trap/exit skeleton
//! - `generators`: expression and statement translation

pub mod generators;
pub mod globals;
pub mod guard;
pub mod runtime;
pub mod values;
