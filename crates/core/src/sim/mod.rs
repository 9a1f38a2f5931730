//! Simulation utilities: image loading and the clocked run loop.

/// Hex memory image parsing.
pub mod loader;
/// The clocked simulation driver.
pub mod simulator;
