//! What the decoders need to know about the program being inspected: its
//! platform (architecture, word size, byte order) and whether it is a Linux
//! kernel image.
use strum::{Display, EnumString};

use crate::arch::Arch;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub const fn host() -> Endianness {
        if cfg!(target_endian = "little") {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    pub const fn is_little(&self) -> bool {
        matches!(self, Endianness::Little)
    }

    /// Whether values stored in this byte order must be swapped to be read on
    /// the host.
    pub const fn needs_swap(&self) -> bool {
        self.is_little() != Endianness::host().is_little()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PlatformFlags {
    pub is_64_bit: bool,
    pub endianness: Endianness,
}

/// An architecture together with the flags a particular program uses on it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Platform {
    arch: Arch,
    flags: PlatformFlags,
}

impl Platform {
    /// Platform with the architecture's default flags.
    pub fn new(arch: Arch) -> Platform {
        Platform {
            arch,
            flags: arch.info().default_flags,
        }
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Platform {
        self.flags.endianness = endianness;
        self
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn endianness(&self) -> Endianness {
        self.flags.endianness
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ProgramFlags {
    /// The program is a Linux kernel (live `/proc/kcore` or a vmcore).
    pub is_linux_kernel: bool,
}

/// The program whose threads are being unwound.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Program {
    pub platform: Platform,
    pub flags: ProgramFlags,
}

impl Program {
    pub fn new(platform: Platform) -> Program {
        Program {
            platform,
            flags: ProgramFlags::default(),
        }
    }

    pub fn linux_kernel(platform: Platform) -> Program {
        Program {
            platform,
            flags: ProgramFlags {
                is_linux_kernel: true,
            },
        }
    }

    pub fn is_linux_kernel(&self) -> bool {
        self.flags.is_linux_kernel
    }

    /// Whether words read from this program's memory need a byte swap.
    pub fn bswap(&self) -> bool {
        self.platform.endianness().needs_swap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn host_order_never_swaps() {
        assert!(!Endianness::host().needs_swap());
        let other = if Endianness::host().is_little() {
            Endianness::Big
        } else {
            Endianness::Little
        };
        assert!(other.needs_swap());
    }

    #[test]
    fn program_bswap_follows_platform() {
        let platform = Platform::new(Arch::Ppc64).with_endianness(Endianness::host());
        assert!(!Program::new(platform).bswap());

        let swapped = platform.with_endianness(if Endianness::host().is_little() {
            Endianness::Big
        } else {
            Endianness::Little
        });
        assert!(Program::linux_kernel(swapped).bswap());
        assert!(Program::linux_kernel(swapped).is_linux_kernel());
    }

    #[test]
    fn endianness_parses() {
        assert_eq!(Endianness::from_str("big").ok(), Some(Endianness::Big));
        assert_eq!(Endianness::Little.to_string(), "little");
        assert!(Endianness::from_str("middle").is_err());
    }
}
