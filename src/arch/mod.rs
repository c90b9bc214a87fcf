//! Architecture descriptors and the entry points that seed a thread's initial
//! registers for the unwinder.
//!
//! Register state reaches us in three shapes:
//! - a register save structure in memory (`struct pt_regs` or its equivalent),
//! - the `NT_PRSTATUS` note of a core dump,
//! - the saved context of a Linux kernel task that is switched out.
//!
//! Every architecture implements [`Architecture`] once, covering all three,
//! and is registered in a static table keyed by name.
use phf::phf_map;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::trace;

use crate::error::{DecodeError, Result};
use crate::object::{MemoryReader, Object, ObjectAccessor, ObjectBuffer};
use crate::program::{PlatformFlags, Program};
use crate::register_info::{RegisterId, RegisterInfo};
use crate::registers::{RegisterSet, RegisterSink};

pub mod ppc64;

/// Supported architectures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Arch {
    Ppc64,
}

impl Arch {
    pub fn architecture(&self) -> &'static dyn Architecture {
        match self {
            Arch::Ppc64 => &ppc64::PPC64,
        }
    }

    pub fn info(&self) -> &'static ArchitectureInfo {
        self.architecture().info()
    }
}

/// Static description of an architecture.
#[derive(Debug)]
pub struct ArchitectureInfo {
    pub name: &'static str,
    pub arch: Arch,
    /// Flags a program on this architecture has unless told otherwise.
    pub default_flags: PlatformFlags,
    /// Registers in DWARF numbering.
    pub registers: &'static [RegisterInfo],
    pub stack_pointer: RegisterId,
}

impl ArchitectureInfo {
    pub fn word_size_bits(&self) -> u32 {
        if self.default_flags.is_64_bit { 64 } else { 32 }
    }

    pub fn find_register(&self, name: &str) -> Option<&'static RegisterInfo> {
        crate::register_info::find_by_name(self.registers, name)
    }
}

/// Architecture specific knowledge of how captured registers map onto the
/// architecture's DWARF registers.
///
/// Each entry point either populates everything it can recover or fails. The
/// size of the captured block is checked before anything is written to the
/// sink.
pub trait Architecture: Sync {
    fn info(&self) -> &'static ArchitectureInfo;

    /// Seed registers from a register save structure in memory.
    fn pt_regs_set_initial_registers(
        &self,
        regs: ObjectBuffer<'_>,
        sink: &mut dyn RegisterSink,
    ) -> Result<()>;

    /// Seed registers from the descriptor of an `NT_PRSTATUS` note.
    fn prstatus_set_initial_registers(
        &self,
        prog: &Program,
        prstatus: &[u8],
        sink: &mut dyn RegisterSink,
    ) -> Result<()>;

    /// Seed registers of a Linux kernel task that is not currently running,
    /// from what it saved on its stack when it was switched out.
    fn linux_kernel_set_initial_registers(
        &self,
        prog: &Program,
        objects: &dyn ObjectAccessor,
        memory: &dyn MemoryReader,
        task: &Object,
        sink: &mut dyn RegisterSink,
    ) -> Result<()>;

    /// An empty register set accepting this architecture's registers.
    fn new_register_set(&self) -> RegisterSet {
        RegisterSet::new(self.info().registers)
    }
}

static ARCHITECTURES: phf::Map<&'static str, Arch> = phf_map! {
    "ppc64" => Arch::Ppc64,
    "ppc64le" => Arch::Ppc64,
    "powerpc64" => Arch::Ppc64,
    "powerpc64le" => Arch::Ppc64,
};

/// Find an architecture by name or alias.
pub fn lookup(name: &str) -> Result<&'static dyn Architecture> {
    let key = name.to_ascii_lowercase();
    match ARCHITECTURES.get(key.as_str()) {
        Some(arch) => {
            trace!("architecture {name:?} resolved to {arch}");
            Ok(arch.architecture())
        }
        None => Err(DecodeError::UnknownArchitecture(name.to_string())),
    }
}

/// Every supported architecture, once each.
pub fn architectures() -> impl Iterator<Item = &'static dyn Architecture> {
    Arch::iter().map(|arch| arch.architecture())
}

/// Names (including aliases) that [`lookup`] accepts.
pub fn known_names() -> Vec<&'static str> {
    let mut names: Vec<_> = ARCHITECTURES.keys().copied().collect();
    names.sort_unstable();
    names
}
