//! Instruction field extraction and the operation enum.
//!
//! Provides bit extraction for RISC-V instruction fields and the `Op` enum
//! covering the 37 RV32I operations the pipeline executes, together with the
//! classification helpers the pipeline stages dispatch on.

use crate::common::AccessWidth;

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for extracting a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }
}

/// The RV32I operations executed by the pipeline.
///
/// `Unknown` never reaches the reorder buffer: fetch substitutes a no-op
/// (`ADDI x0, x0, 0`) for any encoding that fails to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Op {
    Lui,
    Auipc,
    Jal,
    Jalr,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    #[default]
    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
    Unknown,
}

/// Encoding format of an operation, driving immediate formation and the
/// operand source set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Register-register; sources rs1 and rs2, no immediate.
    R,
    /// Immediate; source rs1, 12-bit sign-extended immediate.
    I1,
    /// Immediate shift; source rs1, 5-bit zero-extended shift amount.
    I2,
    /// Store; sources rs1 and rs2, split 12-bit immediate.
    S,
    /// Branch; sources rs1 and rs2, 13-bit even immediate.
    B,
    /// Upper immediate; no sources.
    U,
    /// Jump; no sources, 21-bit even immediate.
    J,
}

impl Op {
    /// Encoding format of this operation.
    pub fn format(self) -> Format {
        use Op::*;
        match self {
            Lui | Auipc => Format::U,
            Jal => Format::J,
            Jalr | Lb | Lh | Lw | Lbu | Lhu | Addi | Slti | Sltiu | Xori | Ori | Andi => {
                Format::I1
            }
            Slli | Srli | Srai => Format::I2,
            Beq | Bne | Blt | Bge | Bltu | Bgeu => Format::B,
            Sb | Sh | Sw => Format::S,
            Add | Sub | Sll | Slt | Sltu | Xor | Srl | Sra | Or | And => Format::R,
            Unknown => Format::I1,
        }
    }

    /// True for the six conditional branches.
    pub fn is_branch(self) -> bool {
        matches!(self, Op::Beq | Op::Bne | Op::Blt | Op::Bge | Op::Bltu | Op::Bgeu)
    }

    /// True for the five loads.
    pub fn is_load(self) -> bool {
        matches!(self, Op::Lb | Op::Lh | Op::Lw | Op::Lbu | Op::Lhu)
    }

    /// True for the three stores.
    pub fn is_store(self) -> bool {
        matches!(self, Op::Sb | Op::Sh | Op::Sw)
    }

    /// True when the operation reads rs1 as its first operand.
    pub fn reads_rs1(self) -> bool {
        !matches!(self.format(), Format::U | Format::J)
    }

    /// True when the operation reads rs2 as its second operand.
    pub fn reads_rs2(self) -> bool {
        matches!(self.format(), Format::R | Format::S | Format::B)
    }

    /// True when the operation writes its destination register.
    ///
    /// Branches and stores have no destination; everything else writes rd
    /// (writes to x0 are discarded by the alias file).
    pub fn writes_dest(self) -> bool {
        !self.is_branch() && !self.is_store()
    }

    /// Memory access width for loads and stores.
    ///
    /// # Panics
    ///
    /// Panics for non-memory operations; callers dispatch on `is_load` /
    /// `is_store` first.
    pub fn access_width(self) -> AccessWidth {
        match self {
            Op::Lb | Op::Sb => AccessWidth::Byte,
            Op::Lbu => AccessWidth::ByteUnsigned,
            Op::Lh | Op::Sh => AccessWidth::Half,
            Op::Lhu => AccessWidth::HalfUnsigned,
            Op::Lw | Op::Sw => AccessWidth::Word,
            _ => panic!("access width of non-memory op {:?}", self),
        }
    }
}
