#![allow(dead_code)]
//! Test doubles for the collaborators the decoders talk to.

use std::cell::RefCell;

use anyhow::anyhow;
use jdb_arch::error::{DecodeError, Result};
use jdb_arch::object::{MemoryReader, Object, ObjectAccessor, ObjectKind};
use jdb_arch::program::Endianness;
use jdb_arch::register_info::RegisterId;
use jdb_arch::registers::RegisterSink;

/// Words in the `struct pt_regs` prefix the decoder reads.
pub const PT_REGS_WORDS: usize = 39;
pub const NIP_SLOT: usize = 32;
pub const LINK_SLOT: usize = 36;
pub const CCR_SLOT: usize = 38;

pub fn other_endianness() -> Endianness {
    if Endianness::host().is_little() {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

/// Builds register blocks word by word.
#[derive(Clone, Debug)]
pub struct RegsBuilder {
    words: Vec<u64>,
}

impl Default for RegsBuilder {
    fn default() -> Self {
        Self {
            words: vec![0; PT_REGS_WORDS],
        }
    }
}

impl RegsBuilder {
    /// Every GPR holds a distinct, byte-asymmetric value.
    pub fn patterned() -> Self {
        let mut b = Self::default();
        for i in 0..32 {
            b = b.gpr(i, gpr_pattern(i));
        }
        b.nip(0xc000_0000_0010_2030)
            .link(0xc000_0000_0040_5060)
            .ccr(0x2480_4228)
    }

    pub fn gpr(mut self, n: usize, value: u64) -> Self {
        self.words[n] = value;
        self
    }

    pub fn nip(mut self, value: u64) -> Self {
        self.words[NIP_SLOT] = value;
        self
    }

    pub fn link(mut self, value: u64) -> Self {
        self.words[LINK_SLOT] = value;
        self
    }

    pub fn ccr(mut self, value: u64) -> Self {
        self.words[CCR_SLOT] = value;
        self
    }

    /// Pad with extra trailing words, as a full `struct pt_regs` has.
    pub fn trailing(mut self, words: usize) -> Self {
        self.words.extend(std::iter::repeat_n(0xdead_beef, words));
        self
    }

    pub fn bytes(&self, endianness: Endianness) -> Vec<u8> {
        self.words
            .iter()
            .flat_map(|w| match endianness {
                Endianness::Little => w.to_le_bytes(),
                Endianness::Big => w.to_be_bytes(),
            })
            .collect()
    }
}

pub fn gpr_pattern(n: usize) -> u64 {
    0x0102_0304_0506_0000 | ((n as u64) << 8) | 0x11
}

/// Wrap a register block in an `NT_PRSTATUS` descriptor with an empty header.
pub fn prstatus(regs: &[u8]) -> Vec<u8> {
    let mut note = vec![0u8; 112];
    note.extend_from_slice(regs);
    note
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Write {
    ProgramCounter(u64),
    Registers(RegisterId, Vec<u64>),
}

/// Sink that records every write, optionally refusing a run.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub writes: Vec<Write>,
    pub reject: Option<RegisterId>,
}

impl RecordingSink {
    pub fn rejecting(id: RegisterId) -> Self {
        Self {
            writes: Vec::new(),
            reject: Some(id),
        }
    }

    pub fn program_counter(&self) -> Option<u64> {
        self.writes.iter().find_map(|w| match w {
            Write::ProgramCounter(pc) => Some(*pc),
            _ => None,
        })
    }

    pub fn register(&self, id: RegisterId) -> Option<u64> {
        self.registers()
            .into_iter()
            .find(|(r, _)| *r == id)
            .map(|(_, v)| v)
    }

    /// Every register write flattened to (id, value), in write order.
    pub fn registers(&self) -> Vec<(RegisterId, u64)> {
        let mut out = Vec::new();
        for w in &self.writes {
            if let Write::Registers(first, values) = w {
                for (n, v) in values.iter().enumerate() {
                    out.push((first.nth(n).expect("register id in range"), *v));
                }
            }
        }
        out
    }
}

impl RegisterSink for RecordingSink {
    fn set_program_counter(&mut self, value: u64) -> Result<()> {
        self.writes.push(Write::ProgramCounter(value));
        Ok(())
    }

    fn set_registers(&mut self, first: RegisterId, values: &[u64]) -> Result<()> {
        if self.reject == Some(first) {
            return Err(DecodeError::SinkRejected {
                first: Some(first),
                count: values.len(),
            });
        }
        self.writes.push(Write::Registers(first, values.to_vec()));
        Ok(())
    }
}

/// Object model holding a single task whose `thread.ksp` is `ksp`.
#[derive(Debug)]
pub struct FakeKernel {
    pub ksp: u64,
    /// Member name that fails to resolve.
    pub missing: Option<&'static str>,
}

impl FakeKernel {
    pub fn new(ksp: u64) -> Self {
        Self { ksp, missing: None }
    }

    pub fn task() -> Object {
        Object::reference("struct task_struct *", 0xc000_0000_0123_4000)
    }

    fn check(&self, member: &str) -> anyhow::Result<()> {
        if self.missing == Some(member) {
            return Err(anyhow!("'struct task_struct' has no member '{member}'"));
        }
        Ok(())
    }
}

impl ObjectAccessor for FakeKernel {
    fn member_dereference(&self, obj: &Object, member: &str) -> anyhow::Result<Object> {
        self.check(member)?;
        match (&obj.kind, member) {
            (ObjectKind::Reference { address }, "thread") => {
                Ok(Object::reference("struct thread_struct", address + 0x1000))
            }
            _ => Err(anyhow!("cannot dereference {obj:?}->{member}")),
        }
    }

    fn member(&self, obj: &Object, member: &str) -> anyhow::Result<Object> {
        self.check(member)?;
        match (obj.type_name.as_str(), member) {
            ("struct thread_struct", "ksp") => Ok(Object::value("unsigned long", self.ksp)),
            _ => Err(anyhow!("cannot resolve {obj:?}.{member}")),
        }
    }

    fn read_unsigned(&self, obj: &Object) -> anyhow::Result<u64> {
        match obj.kind {
            ObjectKind::Value(v) => Ok(v),
            ObjectKind::Reference { .. } => Err(anyhow!("not a value: {obj:?}")),
        }
    }
}

/// Memory holding one block of bytes at `base`. Records every request.
#[derive(Debug)]
pub struct FakeMemory {
    pub base: u64,
    pub bytes: Vec<u8>,
    pub requests: RefCell<Vec<(u64, usize, bool)>>,
}

impl FakeMemory {
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self {
            base,
            bytes,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl MemoryReader for FakeMemory {
    fn read_memory(&self, buf: &mut [u8], address: u64, physical: bool) -> anyhow::Result<()> {
        self.requests.borrow_mut().push((address, buf.len(), physical));

        let start = address
            .checked_sub(self.base)
            .and_then(|off| usize::try_from(off).ok())
            .ok_or_else(|| anyhow!("could not find memory segment containing {address:#x}"))?;
        let src = self
            .bytes
            .get(start..start + buf.len())
            .ok_or_else(|| anyhow!("could not find memory segment containing {address:#x}"))?;
        buf.copy_from_slice(src);
        Ok(())
    }
}
