//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! simulated core. It provides:
//! 1. **Defaults:** Baseline hardware constants (ROB depth, predictor table,
//!    memory latency).
//! 2. **Structures:** Hierarchical config for the core, the memory system,
//!    and the simulation driver.
//!
//! Configuration is supplied via JSON or built programmatically; the CLI maps
//! its flags onto `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden.
mod defaults {
    /// Number of reorder-buffer entries.
    ///
    /// The ROB is a circular buffer; fetch stalls while the tail slot is
    /// occupied, so this bounds the number of in-flight instructions.
    pub const ROB_SIZE: usize = 16;

    /// Number of 2-bit counters in the branch predictor table.
    ///
    /// The table is direct-mapped on the low PC bits (word-aligned), so this
    /// must be a power of two.
    pub const PREDICTOR_ENTRIES: usize = 16;

    /// Memory port latency in cycles.
    ///
    /// Every load and store transaction occupies the port for this many
    /// cycles before its completion event fires.
    pub const ACCESS_LATENCY: u64 = 3;

    /// Watchdog tick limit (0 disables the watchdog).
    pub const MAX_TICKS: u64 = 0;
}

/// Core pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Reorder-buffer capacity in entries.
    pub rob_size: usize,
    /// Branch predictor table size in 2-bit counters (power of two).
    pub predictor_entries: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rob_size: defaults::ROB_SIZE,
            predictor_entries: defaults::PREDICTOR_ENTRIES,
        }
    }
}

/// Memory system configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Cycles a load or store occupies the memory port.
    pub access_latency: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            access_latency: defaults::ACCESS_LATENCY,
        }
    }
}

/// Simulation driver configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Abort with an error after this many ticks; 0 means unbounded.
    pub max_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_ticks: defaults::MAX_TICKS,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Core pipeline parameters.
    pub core: CoreConfig,
    /// Memory system parameters.
    pub memory: MemoryConfig,
    /// Simulation driver parameters.
    pub sim: SimConfig,
}
