//! Tagged Slot Layout and Runtime Support
//!
//! Every declared variable compiles to one fixed-layout global record. All four
//! fields always exist, whichever tag is active.
//!
//! ## Memory Layout
//! ```text
//! offset  0: i64     integer payload
//! offset  8: double  floating payload
//! offset 16: ptr     text payload (NUL-terminated bytes)
//! offset 24: i8      type tag
//! ```
//!
//! ## Type Tags
//! - INTEGER = 0 (also the zero-initialized default)
//! - DOUBLE = 1
//! - STATIC_TEXT = 2: pointer to a constant emitted into the module
//! - HEAP_TEXT = 3: reserved for heap-allocated text, never produced by codegen
//!
//! The `extern "C"` functions at the bottom are the runtime support ABI the
//! generated module calls into; link this crate to run a compiled program.
use std::ffi::{c_char, CStr};
use thiserror::Error;

/// Runtime type tag stored in the last field of a slot.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Integer = 0,
    Double = 1,
    StaticText = 2,
    HeapText = 3,
}

impl TypeTag {
    #[inline]
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(TypeTag::Integer),
            1 => Some(TypeTag::Double),
            2 => Some(TypeTag::StaticText),
            3 => Some(TypeTag::HeapText),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SlotFault {
    #[error("Unknown type tag {0} in global slot")]
    UnknownTag(u8),
    #[error("Text slot holds a null pointer")]
    NullText,
}

/// Rust view of a global slot, laid out exactly as the generated module
/// lays out `{ i64, double, ptr, i8 }`.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct TaggedSlot {
    pub integer: i64,
    pub double: f64,
    pub text: *const c_char,
    pub tag: u8,
}

impl Default for TaggedSlot {
    fn default() -> Self {
        TaggedSlot {
            integer: 0,
            double: 0.0,
            text: std::ptr::null(),
            tag: TypeTag::Integer.as_u8(),
        }
    }
}

impl TaggedSlot {
    #[inline]
    pub fn from_int(value: i64) -> Self {
        TaggedSlot {
            integer: value,
            ..Default::default()
        }
    }

    #[inline]
    pub fn from_double(value: f64) -> Self {
        TaggedSlot {
            double: value,
            tag: TypeTag::Double.as_u8(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn from_static_text(text: &'static CStr) -> Self {
        TaggedSlot {
            text: text.as_ptr(),
            tag: TypeTag::StaticText.as_u8(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn type_tag(&self) -> Option<TypeTag> {
        TypeTag::from_u8(self.tag)
    }

    /// Overwrites every field with the source's, whatever its tag.
    #[inline]
    pub fn copy_from(&mut self, src: &TaggedSlot) {
        *self = *src;
    }

    /// Formats the active payload the way `_printGlobal` prints it.
    ///
    /// # Safety
    /// For text tags, `text` must be null or point to a NUL-terminated string
    /// that outlives the call.
    pub unsafe fn render(&self) -> Result<String, SlotFault> {
        match self.type_tag() {
            Some(TypeTag::Integer) => Ok(self.integer.to_string()),
            Some(TypeTag::Double) => Ok(self.double.to_string()),
            Some(TypeTag::StaticText) | Some(TypeTag::HeapText) => {
                if self.text.is_null() {
                    return Err(SlotFault::NullText);
                }
                Ok(CStr::from_ptr(self.text).to_string_lossy().into_owned())
            }
            None => Err(SlotFault::UnknownTag(self.tag)),
        }
    }
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn _printInteger(value: i64) {
    println!("{}", value);
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn _printDouble(value: f64) {
    println!("{}", value);
}

/// # Safety
/// `text` must point to a NUL-terminated string.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn _printConstString(text: *const c_char) {
    println!("{}", CStr::from_ptr(text).to_string_lossy());
}

/// # Safety
/// `slot` must point to a live global slot.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn _printGlobal(slot: *const TaggedSlot) {
    match (*slot).render() {
        Ok(text) => println!("{}", text),
        Err(fault) => {
            eprintln!("runtime fault: {}", fault);
            std::process::abort();
        }
    }
}

/// # Safety
/// Both pointers must point to live global slots.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn _globalVariableCopy(dst: *mut TaggedSlot, src: *const TaggedSlot) {
    (*dst).copy_from(&*src);
}
