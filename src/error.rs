use thiserror::Error;

use crate::register_info::RegisterId;

/// Everything that can go wrong while turning a captured register block into
/// a register set.
///
/// Object-model and memory-read failures come from collaborators and are kept
/// as-is, tagged by where they happened. Their message is not rewritten.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The register block is smaller than the architecture's save area.
    #[error("registers are truncated: got {size} bytes, need at least {minimum}")]
    TruncatedRegisters { size: usize, minimum: usize },
    /// The `NT_PRSTATUS` note has no room for a register block after its header.
    #[error("NT_PRSTATUS is truncated: got {size} bytes, need more than {minimum}")]
    TruncatedNote { size: usize, minimum: usize },
    /// The register sink refused a write. `first` is `None` for the program
    /// counter, otherwise the start of the refused run of `count` registers.
    #[error("register set rejected {}", rejected_target(.first, .count))]
    SinkRejected {
        first: Option<RegisterId>,
        count: usize,
    },
    /// The memory reader could not supply the requested bytes.
    #[error(transparent)]
    MemoryReadFailed(anyhow::Error),
    /// The object model could not resolve a member or read its value.
    #[error(transparent)]
    FieldResolutionFailed(anyhow::Error),
    /// No descriptor is registered under this name.
    #[error("unknown architecture: {0:?}")]
    UnknownArchitecture(String),
}

fn rejected_target(first: &Option<RegisterId>, count: &usize) -> String {
    match first {
        Some(first) => format!("{count} register(s) starting at {first}"),
        None => "the program counter".to_string(),
    }
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;
