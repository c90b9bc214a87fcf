//! Static register tables, one per supported architecture.
//!
//! Register ids follow the DWARF register numbering of each architecture, which
//! is what call frame information refers to and what the unwinder indexes by.
use std::fmt;

use strum::{Display, IntoStaticStr};

pub mod ppc64;

/// DWARF register number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RegisterId(pub u16);

impl RegisterId {
    pub const fn id(&self) -> u16 {
        self.0
    }

    /// The id `n` places after this one. Runs of registers handed to a sink are
    /// numbered this way.
    pub fn nth(&self, n: usize) -> Option<RegisterId> {
        u16::try_from(n)
            .ok()
            .and_then(|n| self.0.checked_add(n))
            .map(RegisterId)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad grouping for registers, used for display and filtering.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum RegisterType {
    GeneralPurpose,
    /// Return address register.
    Link,
    /// One 4-bit field of a packed condition register, modelled as its own register.
    ConditionField,
}

/// Fully derived register information.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct RegisterInfo {
    /// Conventional assembler name, e.g. `r1` or `cr0`.
    pub name: &'static str,
    pub id: RegisterId,
    pub register_type: RegisterType,
    /// Number of meaningful bits in the stored value.
    pub bits: u32,
}

pub fn find_by_name<'a>(table: &'a [RegisterInfo], name: &str) -> Option<&'a RegisterInfo> {
    table.iter().find(|r| r.name == name)
}

pub fn find_by_id(table: &[RegisterInfo], id: RegisterId) -> Option<&RegisterInfo> {
    table.iter().find(|r| r.id == id)
}
