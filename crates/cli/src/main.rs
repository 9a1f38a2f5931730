//! Out-of-order RV32I simulator CLI.
//!
//! This binary is the single entry point for running memory images. It
//! performs:
//! 1. **Image loading:** Parses the hex memory image from stdin or a file.
//! 2. **Simulation:** Ticks the core until the halt sentinel retires.
//! 3. **Reporting:** Prints the result byte to stdout; diagnostics and the
//!    optional statistics block go to stderr.

use clap::Parser;
use log::LevelFilter;
use std::io;
use std::process;

use ooosim_core::common::SimError;
use ooosim_core::sim::loader;
use ooosim_core::{Config, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "ooosim",
    author,
    version,
    about = "Cycle-level out-of-order RV32I core simulator",
    long_about = "Simulates an RV32I core with speculative out-of-order execution.\n\n\
        The memory image is read from stdin (or --image) as whitespace-separated\n\
        hex tokens: `@HHHHHHHH` moves the write cursor, `HH` writes one byte.\n\
        Execution starts at address 0 and ends when the halt word 0x0ff00513\n\
        retires; the low byte of x10 is printed in decimal on stdout.\n\n\
        Examples:\n  \
        ooosim < testcases/magic.data\n  \
        ooosim --image testcases/magic.data --stats\n  \
        ooosim --latency 6 --trace < program.data"
)]
struct Cli {
    /// Memory image file; reads stdin when omitted.
    #[arg(short, long)]
    image: Option<String>,

    /// Memory port latency in cycles.
    #[arg(long)]
    latency: Option<u64>,

    /// Reorder buffer entries.
    #[arg(long)]
    rob_size: Option<usize>,

    /// Branch predictor table entries (power of two).
    #[arg(long)]
    predictor_entries: Option<usize>,

    /// Abort after this many ticks; 0 means unbounded.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Print the statistics block to stderr after the run.
    #[arg(long)]
    stats: bool,

    /// Emit per-cycle pipeline tracing on stderr.
    #[arg(long)]
    trace: bool,
}

impl Cli {
    /// Maps the command-line flags onto the simulator configuration.
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(latency) = self.latency {
            config.memory.access_latency = latency;
        }
        if let Some(rob_size) = self.rob_size {
            config.core.rob_size = rob_size;
        }
        if let Some(entries) = self.predictor_entries {
            config.core.predictor_entries = entries;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.sim.max_ticks = max_ticks;
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.trace {
        logger.filter_level(LevelFilter::Trace);
    }
    logger.init();

    let config = cli.config();

    let mem = match &cli.image {
        Some(path) => loader::parse_image_file(path),
        None => loader::parse_image(io::stdin().lock()),
    };
    let mem = match mem {
        Ok(mem) => mem,
        Err(e) => {
            eprintln!("ooosim: {}", e);
            process::exit(1);
        }
    };

    let mut sim = Simulator::new(&config, mem);
    match sim.run() {
        Ok(value) => {
            println!("{}", value);
            if cli.stats {
                sim.stats().report();
            }
        }
        Err(e @ SimError::TickLimitExceeded(_)) => {
            eprintln!("ooosim: {}", e);
            if cli.stats {
                sim.stats().report();
            }
            process::exit(2);
        }
        Err(e) => {
            eprintln!("ooosim: {}", e);
            process::exit(1);
        }
    }
}
