//! The clocked simulation driver.
//!
//! Owns the core and advances it tick by tick until the halt sentinel
//! retires. There is no timeout by default; the optional watchdog exists for
//! harnesses that want runaway programs to fail instead of spinning.

use log::debug;

use crate::common::SimError;
use crate::config::Config;
use crate::core::Core;
use crate::mem::SparseMemory;
use crate::stats::SimStats;

/// Top-level simulator: the core plus the run loop.
pub struct Simulator {
    /// The simulated core.
    pub core: Core,
    max_ticks: u64,
}

impl Simulator {
    /// Creates a simulator over a loaded memory image.
    pub fn new(config: &Config, mem: SparseMemory) -> Self {
        Self {
            core: Core::new(config, mem),
            max_ticks: config.sim.max_ticks,
        }
    }

    /// Advances the simulation by one clock cycle.
    pub fn tick(&mut self) {
        self.core.tick();
    }

    /// Runs until the halt sentinel retires and returns the result byte.
    ///
    /// With a configured watchdog, gives up after `max_ticks` cycles.
    pub fn run(&mut self) -> Result<u8, SimError> {
        while !self.core.halted() {
            if self.max_ticks != 0 && self.core.stats().ticks >= self.max_ticks {
                return Err(SimError::TickLimitExceeded(self.max_ticks));
            }
            self.core.tick();
        }
        debug!(
            "halted after {} ticks, {} instructions",
            self.core.stats().ticks,
            self.core.stats().retired
        );
        Ok(self.core.return_value())
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> &SimStats {
        self.core.stats()
    }
}
