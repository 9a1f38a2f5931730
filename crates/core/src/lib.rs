//! Out-of-order RV32I core simulator library.
//!
//! This crate implements a cycle-level simulator of a 32-bit RISC-V integer
//! core with the following:
//! 1. **Core:** Tomasulo-style pipeline (fetch/rename, issue/execute, in-order
//!    commit) built around a reorder buffer and a register alias file.
//! 2. **Speculation:** A bimodal branch predictor, speculative fetch past
//!    unresolved branches, and a full-pipeline flush on misprediction.
//! 3. **Memory:** A flat little-endian byte memory behind a single-transaction
//!    multi-cycle port that orders loads against uncommitted stores.
//! 4. **ISA:** Decoding for the RV32I base integer instruction set.
//! 5. **Simulation:** Hex image loader, clocked run loop, and statistics.

/// Bit helpers, access widths, and error types.
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Core pipeline (alias file, reorder buffer, predictor, port, stages).
pub mod core;
/// Instruction set (opcodes, field extraction, decoder).
pub mod isa;
/// Sparse byte-addressed main memory.
pub mod mem;
/// Image loading and the clocked simulation driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main core type; holds all pipeline and architectural state.
pub use crate::core::Core;
/// Simulation driver; construct with `Simulator::new` and call `run`.
pub use crate::sim::simulator::Simulator;
