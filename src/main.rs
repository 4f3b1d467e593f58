use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

use copro816::config::{CoproConfig, DEFAULT_SLICE_CYCLES};
use copro816::copro::Copro65816;
use copro816::cpu::Register;
use copro816::rom::RomImage;
use copro816::tube::{NullTube, TubeLines};

/// Minimal stderr logger; the level is fixed by `--log-level`.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr(),
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

#[derive(Parser, Debug)]
#[command(version, about = "65816 tube co-processor core", long_about = None)]
struct CommandLineArgs {
    /// ROM image for $8000-$FFFF (shorter images are placed at the top)
    #[arg(short, long)]
    rom: PathBuf,

    /// Bank holding the native-mode interrupt vectors
    #[arg(long, default_value_t = 0)]
    vector_bank: u8,

    /// Cycles per execution slice
    #[arg(long, default_value_t = DEFAULT_SLICE_CYCLES)]
    slice: i32,

    /// Number of slices to run before printing the register state
    #[arg(long, default_value_t = 1_000_000)]
    slices: u64,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CommandLineArgs::parse();

    log::set_logger(&LOGGER).map_err(|e| e.to_string())?;
    log::set_max_level(args.log_level);

    let rom = RomImage::from_file(&args.rom)?;
    let config = CoproConfig::default()
        .with_native_vector_bank(args.vector_bank)
        .with_slice_cycles(args.slice);
    let tube = NullTube::new(TubeLines::new());
    let mut copro = Copro65816::new(rom, Box::new(tube), config);

    let cycles = copro.run_slices(args.slices);

    let cpu = copro.cpu();
    println!(
        "{} instructions, {} cycles",
        cpu.instructions(),
        cycles
    );
    for reg in Register::ALL {
        println!("{:>2}: {:04X}", reg.name(), cpu.get_register(reg));
    }
    println!(" P: {}", cpu.state().p);
    Ok(())
}
