//! ppc64 (64-bit PowerPC, ELFv1 and ELFv2).
//!
//! All three register sources carry the kernel's `struct pt_regs` layout: 32
//! GPRs followed by nip, msr, orig_gpr3, ctr, link, xer and ccr, each one
//! doubleword.
use memoffset::offset_of;
use tracing::{debug, trace};

use crate::arch::{Arch, Architecture, ArchitectureInfo};
use crate::error::{DecodeError, Result};
use crate::object::{MemoryReader, Object, ObjectAccessor, ObjectBuffer};
use crate::program::{Endianness, PlatformFlags, Program};
use crate::register_info::RegisterId;
use crate::register_info::ppc64::{
    CR_FIELD_COUNT, FIRST_CALLEE_SAVED_GPR, FIRST_CR_FIELD, GPR_COUNT, LINK_REGISTER,
    REGISTERS_INFO, STACK_POINTER,
};
use crate::registers::RegisterSink;

/// The part of `struct pt_regs` the unwinder needs. Anything after `ccr` is
/// never consulted.
#[repr(C)]
#[allow(dead_code)]
struct PtRegs {
    gpr: [u64; GPR_COUNT],
    nip: u64,
    msr: u64,
    orig_gpr3: u64,
    ctr: u64,
    link: u64,
    xer: u64,
    ccr: u64,
}

const WORD_SIZE: usize = size_of::<u64>();

/// Smallest register block we accept, in bytes.
pub const PT_REGS_SIZE: usize = size_of::<PtRegs>();

/// `struct elf_prstatus` fields that precede `pr_reg` (signal info, pids,
/// times), in bytes.
pub const PRSTATUS_REGS_OFFSET: usize = 112;

/// Size of the minimal stack frame the kernel keeps below a saved register
/// area.
pub const STACK_FRAME_OVERHEAD: u64 = 112;

/// Size of the frame `_switch` pushes, measured from the saved stack pointer.
pub const SWITCH_FRAME_SIZE: u64 = STACK_FRAME_OVERHEAD + 368;

pub static ARCH_INFO: ArchitectureInfo = ArchitectureInfo {
    name: "ppc64",
    arch: Arch::Ppc64,
    default_flags: PlatformFlags {
        is_64_bit: true,
        endianness: Endianness::Little,
    },
    registers: REGISTERS_INFO,
    stack_pointer: STACK_POINTER,
};

pub static PPC64: Ppc64 = Ppc64;

#[derive(Clone, Copy, Debug, Default)]
pub struct Ppc64;

/// How a register block was captured.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecodeFlags {
    /// The block is in the opposite byte order from the host.
    pub bswap: bool,
    /// The block comes from the `NT_PRSTATUS` note of a Linux kernel vmcore.
    pub linux_kernel_prstatus: bool,
    /// The block was saved by a Linux kernel task being switched out.
    pub linux_kernel_switched_out: bool,
}

fn slot(byte_offset: usize) -> usize {
    byte_offset / WORD_SIZE
}

/// Read the doubleword in slot `slot` of a register block, swapping it into
/// host order if `bswap` is set.
pub fn read_register_word(regs: &[u8], slot: usize, bswap: bool) -> Result<u64> {
    let truncated = || DecodeError::TruncatedRegisters {
        size: regs.len(),
        minimum: slot.saturating_add(1).saturating_mul(WORD_SIZE),
    };
    let range = slot
        .checked_mul(WORD_SIZE)
        .and_then(|start| Some(start..start.checked_add(WORD_SIZE)?))
        .ok_or_else(truncated)?;
    let word: [u8; WORD_SIZE] = regs
        .get(range)
        .and_then(|b| <[u8; WORD_SIZE]>::try_from(b).ok())
        .ok_or_else(truncated)?;

    let value = u64::from_ne_bytes(word);
    Ok(if bswap { value.swap_bytes() } else { value })
}

/// Split the condition register into its eight 4-bit fields, cr0 first.
///
/// Field `i` is bits `4i..4i+4` of the register as the kernel stores it.
pub fn condition_fields(ccr: u64) -> [u64; CR_FIELD_COUNT] {
    let mut fields = [0; CR_FIELD_COUNT];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = (ccr >> (4 * i)) & 0xf;
    }
    fields
}

/// Decode a `struct pt_regs` image into `sink`.
///
/// Every word is read before the first write so that a short block never
/// leaves a partially populated sink behind.
pub fn set_initial_registers_from_struct(
    sink: &mut dyn RegisterSink,
    regs: &[u8],
    flags: DecodeFlags,
) -> Result<()> {
    if regs.len() < PT_REGS_SIZE {
        return Err(DecodeError::TruncatedRegisters {
            size: regs.len(),
            minimum: PT_REGS_SIZE,
        });
    }

    let bswap = flags.bswap;
    let nip = read_register_word(regs, slot(offset_of!(PtRegs, nip)), bswap)?;
    let link = read_register_word(regs, slot(offset_of!(PtRegs, link)), bswap)?;

    // Switched out tasks only save the callee-saved GPRs.
    let min_gpr = if flags.linux_kernel_switched_out {
        FIRST_CALLEE_SAVED_GPR
    } else {
        0
    };
    let first_gpr_slot = slot(offset_of!(PtRegs, gpr));
    let mut gprs = [0u64; GPR_COUNT];
    for (i, gpr) in gprs.iter_mut().enumerate().skip(min_gpr) {
        *gpr = read_register_word(regs, first_gpr_slot + i, bswap)?;
    }

    let ccr = read_register_word(regs, slot(offset_of!(PtRegs, ccr)), bswap)?;
    let cr_fields = condition_fields(ccr);

    // The NT_PRSTATUS note in Linux kernel vmcores is odd. Since Linux v5.7
    // (commit d16a58f8854b, "powerpc: Improve ppc_save_regs()") the saved r1
    // belongs to the caller of the function in nip. Before that, nip was set to
    // the link register anyway. Either way the link register is the pc to use.
    if flags.linux_kernel_prstatus {
        trace!("kernel prstatus: using lr {link:#x} as pc, ignoring nip {nip:#x}");
        sink.set_program_counter(link)?;
    } else {
        sink.set_program_counter(nip)?;
        // Switched out tasks don't save the link register.
        if !flags.linux_kernel_switched_out {
            sink.set_registers(LINK_REGISTER, &[link])?;
        }
    }

    sink.set_registers(RegisterId(min_gpr as u16), &gprs[min_gpr..])?;
    sink.set_registers(FIRST_CR_FIELD, &cr_fields)?;

    trace!(
        "decoded ppc64 registers: r{min_gpr}-r{}, cr0-cr{}",
        GPR_COUNT - 1,
        CR_FIELD_COUNT - 1
    );
    Ok(())
}

impl Architecture for Ppc64 {
    fn info(&self) -> &'static ArchitectureInfo {
        &ARCH_INFO
    }

    fn pt_regs_set_initial_registers(
        &self,
        regs: ObjectBuffer<'_>,
        sink: &mut dyn RegisterSink,
    ) -> Result<()> {
        let flags = DecodeFlags {
            bswap: regs.endianness.needs_swap(),
            ..Default::default()
        };
        debug!("seeding ppc64 registers from {} byte pt_regs", regs.len());
        set_initial_registers_from_struct(sink, regs.bytes, flags)
    }

    fn prstatus_set_initial_registers(
        &self,
        prog: &Program,
        prstatus: &[u8],
        sink: &mut dyn RegisterSink,
    ) -> Result<()> {
        if prstatus.len() <= PRSTATUS_REGS_OFFSET {
            return Err(DecodeError::TruncatedNote {
                size: prstatus.len(),
                minimum: PRSTATUS_REGS_OFFSET,
            });
        }

        let flags = DecodeFlags {
            bswap: prog.bswap(),
            linux_kernel_prstatus: prog.is_linux_kernel(),
            linux_kernel_switched_out: false,
        };
        debug!(
            "seeding ppc64 registers from {} byte NT_PRSTATUS (kernel: {})",
            prstatus.len(),
            flags.linux_kernel_prstatus
        );
        set_initial_registers_from_struct(sink, &prstatus[PRSTATUS_REGS_OFFSET..], flags)
    }

    fn linux_kernel_set_initial_registers(
        &self,
        prog: &Program,
        objects: &dyn ObjectAccessor,
        memory: &dyn MemoryReader,
        task: &Object,
        sink: &mut dyn RegisterSink,
    ) -> Result<()> {
        let ksp = objects
            .member_dereference(task, "thread")
            .and_then(|thread| objects.member(&thread, "ksp"))
            .and_then(|sp| objects.read_unsigned(&sp))
            .map_err(DecodeError::FieldResolutionFailed)?;

        let mut regs = [0u8; PT_REGS_SIZE];
        let address = ksp.wrapping_add(STACK_FRAME_OVERHEAD);
        debug!("reading switched out task registers at {address:#x} (ksp {ksp:#x})");
        memory
            .read_memory(&mut regs, address, false)
            .map_err(DecodeError::MemoryReadFailed)?;

        let flags = DecodeFlags {
            bswap: prog.bswap(),
            linux_kernel_prstatus: false,
            linux_kernel_switched_out: true,
        };
        set_initial_registers_from_struct(sink, &regs, flags)?;

        // r1 isn't in the saved registers; it is just above the switch frame.
        sink.set_registers(STACK_POINTER, &[ksp.wrapping_add(SWITCH_FRAME_SIZE)])
    }
}
