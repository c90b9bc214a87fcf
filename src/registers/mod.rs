use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DecodeError, Result};
use crate::register_info::{RegisterId, RegisterInfo, find_by_id};

/// Per-thread store that the decoders populate and the unwinder reads back.
///
/// Writes either land completely or not at all. A rejected run leaves the sink
/// unchanged.
pub trait RegisterSink {
    fn set_program_counter(&mut self, value: u64) -> Result<()>;

    /// Set `values.len()` consecutive registers starting at `first`.
    fn set_registers(&mut self, first: RegisterId, values: &[u64]) -> Result<()>;
}

/// Initial register state of one thread.
///
/// Only registers from the architecture's table are accepted.
#[derive(Clone, Debug)]
pub struct RegisterSet {
    known: &'static [RegisterInfo],
    program_counter: Option<u64>,
    values: BTreeMap<RegisterId, u64>,
}

impl RegisterSet {
    pub fn new(known: &'static [RegisterInfo]) -> Self {
        Self {
            known,
            program_counter: None,
            values: BTreeMap::new(),
        }
    }

    pub fn program_counter(&self) -> Option<u64> {
        self.program_counter
    }

    pub fn get(&self, id: RegisterId) -> Option<u64> {
        self.values.get(&id).copied()
    }

    pub fn is_set(&self, id: RegisterId) -> bool {
        self.values.contains_key(&id)
    }

    /// Number of registers written, not counting the program counter.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program_counter.is_none() && self.values.is_empty()
    }

    /// Registers that have a value, in register table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static RegisterInfo, u64)> + '_ {
        self.known
            .iter()
            .filter_map(|info| self.values.get(&info.id).map(|v| (info, *v)))
    }
}

impl RegisterSink for RegisterSet {
    fn set_program_counter(&mut self, value: u64) -> Result<()> {
        self.program_counter = Some(value);
        Ok(())
    }

    fn set_registers(&mut self, first: RegisterId, values: &[u64]) -> Result<()> {
        let rejected = || DecodeError::SinkRejected {
            first: Some(first),
            count: values.len(),
        };

        // validate the whole run before touching anything
        let mut ids = Vec::with_capacity(values.len());
        for n in 0..values.len() {
            let id = first.nth(n).ok_or_else(rejected)?;
            if find_by_id(self.known, id).is_none() {
                return Err(rejected());
            }
            ids.push(id);
        }

        for (id, value) in ids.into_iter().zip(values) {
            self.values.insert(id, *value);
        }
        Ok(())
    }
}

impl fmt::Display for RegisterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.program_counter {
            Some(pc) => writeln!(f, "{:<6} {pc:#018x}", "pc")?,
            None => writeln!(f, "{:<6} <unknown>", "pc")?,
        }
        for (info, value) in self.iter() {
            writeln!(f, "{:<6} {value:#018x}", info.name)?;
        }
        Ok(())
    }
}
