//! Compiled Values and the Global Slot Layout
//!
//! Expression translation yields a [`CompiledValue`]. Immediates and string
//! constants have a type known at translation time; a slot reference carries a
//! deferred type that only the tag byte read at runtime can resolve.
//!
//! ## Slot struct: `{ i64, double, ptr, i8 }`
//! Mirrors [`crate::tagged_slot::TaggedSlot`] field for field.

use crate::tagged_slot::TypeTag;
use inkwell::builder::{Builder, BuilderError};
use inkwell::context::Context;
use inkwell::types::StructType;
use inkwell::values::{FloatValue, IntValue, PointerValue};
use inkwell::AddressSpace;

pub const INTEGER_FIELD: u32 = 0;
pub const DOUBLE_FIELD: u32 = 1;
pub const POINTER_FIELD: u32 = 2;
pub const TAG_FIELD: u32 = 3;

/// Translation-time result of an expression block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompiledValue<'ctx> {
    /// An `i64`, folded to a constant whenever its operands were constants.
    Integer(IntValue<'ctx>),
    Double(FloatValue<'ctx>),
    /// Pointer to an immutable NUL-terminated string constant.
    Text(PointerValue<'ctx>),
    /// Pointer to a global slot; the type is only known at runtime.
    Slot(PointerValue<'ctx>),
}

impl<'ctx> CompiledValue<'ctx> {
    /// Short name used in type mismatch diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            CompiledValue::Integer(_) => "integer",
            CompiledValue::Double(_) => "double",
            CompiledValue::Text(_) => "text constant",
            CompiledValue::Slot(_) => "global variable",
        }
    }
}

/// Emits loads and stores against the tagged slot struct.
pub struct SlotLayout<'ctx> {
    context: &'ctx Context,
    struct_type: StructType<'ctx>,
}

impl<'ctx> SlotLayout<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        let struct_type = context.struct_type(
            &[
                context.i64_type().into(),
                context.f64_type().into(),
                context.ptr_type(AddressSpace::default()).into(),
                context.i8_type().into(),
            ],
            false,
        );
        Self {
            context,
            struct_type,
        }
    }

    pub fn struct_type(&self) -> StructType<'ctx> {
        self.struct_type
    }

    /// The `i8` constant for a tag.
    pub fn tag_value(&self, tag: TypeTag) -> IntValue<'ctx> {
        self.context.i8_type().const_int(tag.as_u8() as u64, false)
    }

    fn field_ptr(
        &self,
        builder: &Builder<'ctx>,
        slot: PointerValue<'ctx>,
        field: u32,
        name: &str,
    ) -> Result<PointerValue<'ctx>, BuilderError> {
        builder.build_struct_gep(self.struct_type, slot, field, name)
    }

    /// Reads the tag byte of a slot.
    pub fn load_tag(
        &self,
        builder: &Builder<'ctx>,
        slot: PointerValue<'ctx>,
    ) -> Result<IntValue<'ctx>, BuilderError> {
        let ptr = self.field_ptr(builder, slot, TAG_FIELD, "type")?;
        Ok(builder
            .build_load(self.context.i8_type(), ptr, "tag")?
            .into_int_value())
    }

    /// Reads the integer payload of a slot. Callers check the tag first.
    pub fn load_integer(
        &self,
        builder: &Builder<'ctx>,
        slot: PointerValue<'ctx>,
    ) -> Result<IntValue<'ctx>, BuilderError> {
        let ptr = self.field_ptr(builder, slot, INTEGER_FIELD, "integer")?;
        Ok(builder
            .build_load(self.context.i64_type(), ptr, "int_payload")?
            .into_int_value())
    }

    pub fn store_integer(
        &self,
        builder: &Builder<'ctx>,
        slot: PointerValue<'ctx>,
        value: IntValue<'ctx>,
    ) -> Result<(), BuilderError> {
        let tag_ptr = self.field_ptr(builder, slot, TAG_FIELD, "type")?;
        let int_ptr = self.field_ptr(builder, slot, INTEGER_FIELD, "integer")?;
        builder.build_store(tag_ptr, self.tag_value(TypeTag::Integer))?;
        builder.build_store(int_ptr, value)?;
        Ok(())
    }

    pub fn store_double(
        &self,
        builder: &Builder<'ctx>,
        slot: PointerValue<'ctx>,
        value: FloatValue<'ctx>,
    ) -> Result<(), BuilderError> {
        let tag_ptr = self.field_ptr(builder, slot, TAG_FIELD, "type")?;
        let double_ptr = self.field_ptr(builder, slot, DOUBLE_FIELD, "double")?;
        builder.build_store(tag_ptr, self.tag_value(TypeTag::Double))?;
        builder.build_store(double_ptr, value)?;
        Ok(())
    }

    pub fn store_static_text(
        &self,
        builder: &Builder<'ctx>,
        slot: PointerValue<'ctx>,
        text: PointerValue<'ctx>,
    ) -> Result<(), BuilderError> {
        let tag_ptr = self.field_ptr(builder, slot, TAG_FIELD, "type")?;
        let mem_ptr = self.field_ptr(builder, slot, POINTER_FIELD, "mem")?;
        builder.build_store(tag_ptr, self.tag_value(TypeTag::StaticText))?;
        builder.build_store(mem_ptr, text)?;
        Ok(())
    }
}
