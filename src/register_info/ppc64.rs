//! Registers for ppc64, in the 64-bit ELF ABI DWARF numbering.
//!
//! Only the registers the unwinder needs to start a walk are listed. Floating
//! point and vector registers are never recovered from a register save area.
use crate::register_info::{RegisterId, RegisterInfo, RegisterType};

/// This is the single source of truth.
/// Edit *only* this list when adding/removing registers.
macro_rules! PPC64_REGISTER_LIST {
    ($macro:ident) => {
        $macro! {
            // (EnumVariant, name, dwarf_regno, reg_type, bit-width)
            // r1 is the stack pointer, r2 the TOC pointer, r13 the thread pointer.
            // r14 - r31 are callee-saved.
            (R0, r0, 0, GeneralPurpose, 64);
            (R1, r1, 1, GeneralPurpose, 64);
            (R2, r2, 2, GeneralPurpose, 64);
            (R3, r3, 3, GeneralPurpose, 64);
            (R4, r4, 4, GeneralPurpose, 64);
            (R5, r5, 5, GeneralPurpose, 64);
            (R6, r6, 6, GeneralPurpose, 64);
            (R7, r7, 7, GeneralPurpose, 64);
            (R8, r8, 8, GeneralPurpose, 64);
            (R9, r9, 9, GeneralPurpose, 64);
            (R10, r10, 10, GeneralPurpose, 64);
            (R11, r11, 11, GeneralPurpose, 64);
            (R12, r12, 12, GeneralPurpose, 64);
            (R13, r13, 13, GeneralPurpose, 64);
            (R14, r14, 14, GeneralPurpose, 64);
            (R15, r15, 15, GeneralPurpose, 64);
            (R16, r16, 16, GeneralPurpose, 64);
            (R17, r17, 17, GeneralPurpose, 64);
            (R18, r18, 18, GeneralPurpose, 64);
            (R19, r19, 19, GeneralPurpose, 64);
            (R20, r20, 20, GeneralPurpose, 64);
            (R21, r21, 21, GeneralPurpose, 64);
            (R22, r22, 22, GeneralPurpose, 64);
            (R23, r23, 23, GeneralPurpose, 64);
            (R24, r24, 24, GeneralPurpose, 64);
            (R25, r25, 25, GeneralPurpose, 64);
            (R26, r26, 26, GeneralPurpose, 64);
            (R27, r27, 27, GeneralPurpose, 64);
            (R28, r28, 28, GeneralPurpose, 64);
            (R29, r29, 29, GeneralPurpose, 64);
            (R30, r30, 30, GeneralPurpose, 64);
            (R31, r31, 31, GeneralPurpose, 64);

            // link register, holds the return address
            (LR, lr, 65, Link, 64);

            // the condition register is split into eight 4-bit fields
            (CR0, cr0, 68, ConditionField, 4);
            (CR1, cr1, 69, ConditionField, 4);
            (CR2, cr2, 70, ConditionField, 4);
            (CR3, cr3, 71, ConditionField, 4);
            (CR4, cr4, 72, ConditionField, 4);
            (CR5, cr5, 73, ConditionField, 4);
            (CR6, cr6, 74, ConditionField, 4);
            (CR7, cr7, 75, ConditionField, 4);
        }
    };
}

macro_rules! DEFINE_ENUM {
    ( $( ($register:ident, $name:ident, $dwarf:expr, $reg_type:ident, $bits:expr); )* ) => {
        #[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
        #[allow(clippy::upper_case_acronyms)]
        pub enum Register {
            $( $register, )*
        }

        impl Register {
            pub const fn id(self) -> RegisterId {
                match self {
                    $( Register::$register => RegisterId($dwarf), )*
                }
            }
        }
    };
}

macro_rules! DEFINE_INFO {
    ( $( ($register:ident, $name:ident, $dwarf:expr, $reg_type:ident, $bits:expr); )* ) => {
        pub const REGISTERS_INFO: &[RegisterInfo] = &[
            $(
                RegisterInfo {
                    name: stringify!($name),
                    id: RegisterId($dwarf),
                    register_type: RegisterType::$reg_type,
                    bits: $bits,
                },
            )*
        ];
    };
}

PPC64_REGISTER_LIST!(DEFINE_ENUM);
PPC64_REGISTER_LIST!(DEFINE_INFO);

/// Number of general purpose registers.
pub const GPR_COUNT: usize = 32;
/// First callee-saved general purpose register.
pub const FIRST_CALLEE_SAVED_GPR: usize = 14;
/// Number of condition register fields.
pub const CR_FIELD_COUNT: usize = 8;

pub const STACK_POINTER: RegisterId = Register::R1.id();
pub const LINK_REGISTER: RegisterId = Register::LR.id();
pub const FIRST_CR_FIELD: RegisterId = Register::CR0.id();
