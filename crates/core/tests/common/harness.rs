//! Test harness: load a program, run the clocked core, inspect state.

use ooosim_core::common::AccessWidth;
use ooosim_core::mem::SparseMemory;
use ooosim_core::stats::SimStats;
use ooosim_core::{Config, Simulator};

/// Safety budget so a broken pipeline fails a test instead of hanging it.
const TICK_BUDGET: u64 = 100_000;

pub struct TestContext {
    pub sim: Simulator,
}

impl TestContext {
    /// Loads 32-bit instruction words at address 0 with the default config.
    pub fn load_program(program: &[u32]) -> Self {
        Self::with_config(Config::default(), program)
    }

    /// Loads a program under a custom configuration.
    pub fn with_config(mut config: Config, program: &[u32]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        if config.sim.max_ticks == 0 {
            config.sim.max_ticks = TICK_BUDGET;
        }

        let mut mem = SparseMemory::new();
        for (i, word) in program.iter().enumerate() {
            mem.store(i as u32 * 4, *word, AccessWidth::Word);
        }

        Self {
            sim: Simulator::new(&config, mem),
        }
    }

    /// Runs until the halt sentinel retires and returns the result byte.
    pub fn run_to_halt(&mut self) -> u8 {
        self.sim.run().expect("program did not halt")
    }

    /// Committed value of a general-purpose register.
    pub fn reg(&self, idx: usize) -> u32 {
        self.sim.core.reg(idx)
    }

    /// Word read from the (post-run) memory image.
    pub fn mem_u32(&self, addr: u32) -> u32 {
        self.sim.core.memory().read_u32(addr)
    }

    /// Ticks elapsed so far.
    pub fn ticks(&self) -> u64 {
        self.sim.stats().ticks
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> &SimStats {
        self.sim.stats()
    }
}
