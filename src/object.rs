//! Interfaces to the object model and memory of the program being debugged.
//!
//! Both are provided by the caller. The decoders only ever read through them.
use anyhow::Result;

use crate::program::Endianness;

/// A typed object in the program, as handed out by an [`ObjectAccessor`].
///
/// The decoders never look inside an object; they pass it back to the
/// accessor that produced it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Object {
    /// Name of the object's type, e.g. `struct task_struct *`.
    pub type_name: String,
    pub kind: ObjectKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    /// The object lives in program memory at this address.
    Reference { address: u64 },
    /// The object's value has already been read.
    Value(u64),
}

impl Object {
    pub fn reference(type_name: impl Into<String>, address: u64) -> Object {
        Object {
            type_name: type_name.into(),
            kind: ObjectKind::Reference { address },
        }
    }

    pub fn value(type_name: impl Into<String>, value: u64) -> Object {
        Object {
            type_name: type_name.into(),
            kind: ObjectKind::Value(value),
        }
    }
}

/// Resolves members of typed objects.
pub trait ObjectAccessor {
    /// `obj->member`
    fn member_dereference(&self, obj: &Object, member: &str) -> Result<Object>;
    /// `obj.member`
    fn member(&self, obj: &Object, member: &str) -> Result<Object>;
    /// Value of an integer (or pointer) object, zero extended.
    fn read_unsigned(&self, obj: &Object) -> Result<u64>;
}

/// Reads raw bytes out of the program.
pub trait MemoryReader {
    /// Fill `buf` with the bytes at `address`. `physical` selects the physical
    /// address space instead of the virtual one.
    fn read_memory(&self, buf: &mut [u8], address: u64, physical: bool) -> Result<()>;
}

/// The in-memory contents of a register save structure (for example a
/// `struct pt_regs` value) and the byte order it was stored in.
#[derive(Clone, Copy, Debug)]
pub struct ObjectBuffer<'a> {
    pub bytes: &'a [u8],
    pub endianness: Endianness,
}

impl<'a> ObjectBuffer<'a> {
    pub fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
        Self { bytes, endianness }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
