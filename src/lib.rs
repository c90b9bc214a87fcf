pub mod arch;
pub mod error;
pub mod object;
pub mod options;
pub mod program;
pub mod register_info;
pub mod registers;

pub use arch::{Arch, Architecture, ArchitectureInfo};
pub use error::DecodeError;
pub use registers::{RegisterSet, RegisterSink};
