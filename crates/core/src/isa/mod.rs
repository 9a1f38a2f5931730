//! RV32I instruction set support.
//!
//! Decoding for the base integer instruction set: major opcode constants,
//! field extraction, the operation enum, and immediate formation for all six
//! encoding formats.

/// Instruction decoding and immediate formation.
pub mod decode;
/// Instruction field extraction and the operation enum.
pub mod instruction;
/// Major opcode constants.
pub mod opcodes;

pub use decode::{decode, Decoded};
pub use instruction::{InstructionBits, Op};
