use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use jdb_arch::arch;
use jdb_arch::object::ObjectBuffer;
use jdb_arch::options::{Command, Options};

fn init_logging(options: &Options) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.log_level))?;

    if options.log_file {
        let dir = options.log_dir()?;
        let appender = tracing_appender::rolling::never(&dir, "jdb-arch.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(None)
    }
}

fn main() -> Result<()> {
    let options = Options::parse();
    // keep the guard alive so buffered logs are flushed on exit
    let _guard = init_logging(&options)?;
    options.validate()?;

    match &options.command {
        Command::List => {
            for arch in arch::architectures() {
                let info = arch.info();
                println!(
                    "{} ({}-bit, {} endian by default)",
                    info.name,
                    info.word_size_bits(),
                    info.default_flags.endianness
                );
                for reg in info.registers {
                    println!("  {:<6} {:>4}  {}", reg.name, reg.id.id(), reg.register_type);
                }
            }
            println!("names: {}", arch::known_names().join(", "));
        }
        Command::Prstatus { source, .. } => {
            let arch = source.architecture()?;
            let program = options
                .program()?
                .context("prstatus decode needs a program")?;
            let bytes = std::fs::read(&source.file)
                .with_context(|| format!("reading {:?}", source.file))?;
            debug!("read {} bytes from {:?}", bytes.len(), source.file);

            let mut set = arch.new_register_set();
            arch.prstatus_set_initial_registers(&program, &bytes, &mut set)?;
            print!("{set}");
        }
        Command::PtRegs { source } => {
            let arch = source.architecture()?;
            let platform = source.platform()?;
            let bytes = std::fs::read(&source.file)
                .with_context(|| format!("reading {:?}", source.file))?;
            debug!("read {} bytes from {:?}", bytes.len(), source.file);

            let mut set = arch.new_register_set();
            arch.pt_regs_set_initial_registers(
                ObjectBuffer::new(&bytes, platform.endianness()),
                &mut set,
            )?;
            print!("{set}");
        }
    }

    Ok(())
}
