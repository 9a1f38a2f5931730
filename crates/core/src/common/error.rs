//! Error definitions.
//!
//! This module defines the error handling surface of the simulator library.
//! It provides:
//! 1. **Load Errors:** Malformed memory images and I/O failures.
//! 2. **Runtime Errors:** The watchdog limit for runaway programs.
//! 3. **Error Traits:** Integration with standard Rust error traits.
//!
//! Mispredictions and indirect jumps are not errors; they are handled by the
//! pipeline flush protocol. Impossible pipeline states panic instead of
//! returning an error, because they indicate a simulator bug.

use std::fmt;
use std::io;

/// Errors reported by the simulator library.
#[derive(Debug)]
pub enum SimError {
    /// A memory image token parsed neither as an `@` address directive nor
    /// as a hexadecimal byte. Carries the offending token and its 1-based
    /// line number.
    MalformedImage { token: String, line: usize },

    /// Reading the input stream failed.
    Io(io::Error),

    /// The configured tick limit elapsed before the halt sentinel retired.
    TickLimitExceeded(u64),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::MalformedImage { token, line } => {
                write!(f, "malformed memory image at line {}: {:?}", line, token)
            }
            SimError::Io(e) => write!(f, "failed to read memory image: {}", e),
            SimError::TickLimitExceeded(limit) => {
                write!(f, "no halt after {} ticks", limit)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        SimError::Io(e)
    }
}
