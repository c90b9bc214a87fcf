use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};

use crate::arch::{self, Architecture};
use crate::program::{Endianness, Platform, Program};

#[derive(Clone, Debug, Args)]
pub struct Source {
    /// Architecture name, e.g. `ppc64`.
    #[arg(short = 'a', long = "arch", default_value = "ppc64")]
    pub arch: String,
    /// Byte order of the captured registers. Defaults to the architecture's.
    #[arg(short = 'e', long = "endian")]
    pub endian: Option<Endianness>,
    /// File holding the raw captured bytes.
    pub file: PathBuf,
}

impl Source {
    pub fn architecture(&self) -> Result<&'static dyn Architecture> {
        Ok(arch::lookup(&self.arch)?)
    }

    pub fn platform(&self) -> Result<Platform> {
        let platform = Platform::new(self.architecture()?.info().arch);
        Ok(match self.endian {
            Some(endian) => platform.with_endianness(endian),
            None => platform,
        })
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// List supported architectures and their registers.
    List,
    /// Decode the descriptor of an `NT_PRSTATUS` core dump note.
    Prstatus {
        #[command(flatten)]
        source: Source,
        /// The note comes from a Linux kernel vmcore.
        #[arg(short = 'k', long = "linux-kernel")]
        linux_kernel: bool,
    },
    /// Decode a raw register save structure (`struct pt_regs`).
    PtRegs {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Clone, Debug, Parser)]
#[command(version, about = "JDB architecture register decoder")]
pub struct Options {
    #[command(subcommand)]
    pub command: Command,
    /// Log filter, used when `RUST_LOG` is not set.
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub log_level: String,
    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", global = true)]
    pub log_file: bool,
    /// Directory for the log file. Defaults to `$XDG_CACHE_HOME/jdb`.
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        let source = match &self.command {
            Command::List => return Ok(()),
            Command::Prstatus { source, .. } | Command::PtRegs { source } => source,
        };

        source.architecture()?;
        if !source.file.is_file() {
            return Err(anyhow!("not a file: {:?}", source.file));
        }
        Ok(())
    }

    /// Program description for a `prstatus` decode.
    pub fn program(&self) -> Result<Option<Program>> {
        match &self.command {
            Command::Prstatus {
                source,
                linux_kernel,
            } => {
                let platform = source.platform()?;
                Ok(Some(if *linux_kernel {
                    Program::linux_kernel(platform)
                } else {
                    Program::new(platform)
                }))
            }
            _ => Ok(None),
        }
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|dir| dir.join("jdb"))
                .ok_or_else(|| anyhow!("no cache directory, pass --log-dir")),
        }
    }
}
