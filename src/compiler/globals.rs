//! Global Slot Table
//!
//! One private, zero-initialized global per declared variable. Slots are keyed
//! by the raw declared id; the emitted symbol is the sanitized id under
//! [`GLOBAL_ID_PREFIX`], so it never collides with generated helper symbols.

use crate::ast::Declaration;
use crate::codegen::CompileError;
use inkwell::module::{Linkage, Module};
use inkwell::types::StructType;
use inkwell::values::PointerValue;
use std::collections::{HashMap, HashSet};

pub const GLOBAL_ID_PREFIX: &str = "_G_ID_";

/// Maps a declared id to its symbol name. Only ASCII letters, digits and
/// `. _ -` survive; every other character becomes `_`.
pub fn sanitize_symbol(id: &str) -> String {
    let body: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", GLOBAL_ID_PREFIX, body)
}

#[derive(Debug, Clone)]
pub struct GlobalSlot<'ctx> {
    pub id: String,
    pub symbol: String,
    pub ptr: PointerValue<'ctx>,
}

#[derive(Default)]
pub struct GlobalTable<'ctx> {
    slots: HashMap<String, GlobalSlot<'ctx>>,
    symbols: HashSet<String>,
}

impl<'ctx> GlobalTable<'ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one slot per declaration, in declaration order.
    pub fn declare_all(
        &mut self,
        module: &Module<'ctx>,
        slot_type: StructType<'ctx>,
        declarations: &[Declaration],
    ) -> Result<(), CompileError> {
        for declaration in declarations {
            if declaration.id.is_empty() {
                return Err(CompileError::MissingField {
                    block: "variable".to_string(),
                    field: "id",
                });
            }
            if self.slots.contains_key(&declaration.id) {
                log::debug!(
                    "variable id {:?} declared twice, reusing its slot",
                    declaration.id
                );
                continue;
            }

            let symbol = self.unique_symbol(&declaration.id);
            let global = module.add_global(slot_type, None, &symbol);
            global.set_linkage(Linkage::Private);
            global.set_initializer(&slot_type.const_zero());
            log::debug!("declared global slot {} for {:?}", symbol, declaration.name);

            self.symbols.insert(symbol.clone());
            self.slots.insert(
                declaration.id.clone(),
                GlobalSlot {
                    id: declaration.id.clone(),
                    symbol,
                    ptr: global.as_pointer_value(),
                },
            );
        }
        Ok(())
    }

    fn unique_symbol(&self, id: &str) -> String {
        let base = sanitize_symbol(id);
        if !self.symbols.contains(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{}.{}", base, n))
            .find(|candidate| !self.symbols.contains(candidate))
            .unwrap_or(base)
    }

    pub fn lookup(&self, id: &str) -> Result<&GlobalSlot<'ctx>, CompileError> {
        if id.is_empty() {
            return Err(CompileError::MissingField {
                block: "variable".to_string(),
                field: "id",
            });
        }
        self.slots
            .get(id)
            .ok_or_else(|| CompileError::UnknownVariable(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
