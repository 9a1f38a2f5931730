//! In-order reference interpreter.
//!
//! A plain fetch-execute loop over the same decoder and memory model,
//! with no pipeline, speculation, or latency. The out-of-order core must
//! produce exactly this architectural state; equivalence tests compare the
//! two after both halt.

use ooosim_core::common::AccessWidth;
use ooosim_core::isa::{decode, Op};
use ooosim_core::mem::SparseMemory;

pub struct Reference {
    pc: u32,
    regs: [u32; 32],
    mem: SparseMemory,
    halted: bool,
}

impl Reference {
    /// Loads 32-bit instruction words at address 0.
    pub fn load_program(program: &[u32]) -> Self {
        let mut mem = SparseMemory::new();
        for (i, word) in program.iter().enumerate() {
            mem.store(i as u32 * 4, *word, AccessWidth::Word);
        }
        Self {
            pc: 0,
            regs: [0; 32],
            mem,
            halted: false,
        }
    }

    /// Runs to the halt sentinel and returns the low byte of x10.
    pub fn run_to_halt(&mut self) -> u8 {
        let mut budget = 1_000_000u32;
        while !self.halted {
            self.step();
            budget -= 1;
            if budget == 0 {
                panic!("reference interpreter did not halt");
            }
        }
        (self.regs[10] & 0xFF) as u8
    }

    pub fn reg(&self, idx: usize) -> u32 {
        self.regs[idx]
    }

    pub fn mem_u32(&self, addr: u32) -> u32 {
        self.mem.read_u32(addr)
    }

    fn write_reg(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    fn step(&mut self) {
        let word = self.mem.read_u32(self.pc);
        let d = decode(word);
        if d.halt {
            self.halted = true;
            return;
        }

        let a = self.regs[d.rs1];
        let b = self.regs[d.rs2];
        let imm = d.imm as u32;
        let link = self.pc.wrapping_add(4);
        let mut next_pc = link;

        match d.op {
            Op::Lui => self.write_reg(d.rd, imm),
            Op::Auipc => self.write_reg(d.rd, self.pc.wrapping_add(imm)),
            Op::Jal => {
                next_pc = self.pc.wrapping_add(imm);
                self.write_reg(d.rd, link);
            }
            Op::Jalr => {
                next_pc = a.wrapping_add(imm);
                self.write_reg(d.rd, link);
            }

            Op::Beq => taken(&mut next_pc, self.pc, imm, a == b),
            Op::Bne => taken(&mut next_pc, self.pc, imm, a != b),
            Op::Blt => taken(&mut next_pc, self.pc, imm, (a as i32) < (b as i32)),
            Op::Bge => taken(&mut next_pc, self.pc, imm, (a as i32) >= (b as i32)),
            Op::Bltu => taken(&mut next_pc, self.pc, imm, a < b),
            Op::Bgeu => taken(&mut next_pc, self.pc, imm, a >= b),

            Op::Lb | Op::Lh | Op::Lw | Op::Lbu | Op::Lhu => {
                let addr = a.wrapping_add(imm);
                let val = self.mem.load(addr, d.op.access_width());
                self.write_reg(d.rd, val);
            }
            Op::Sb | Op::Sh | Op::Sw => {
                let addr = a.wrapping_add(imm);
                self.mem.store(addr, b, d.op.access_width());
            }

            Op::Addi => self.write_reg(d.rd, a.wrapping_add(imm)),
            Op::Slti => self.write_reg(d.rd, ((a as i32) < d.imm) as u32),
            Op::Sltiu => self.write_reg(d.rd, (a < imm) as u32),
            Op::Xori => self.write_reg(d.rd, a ^ imm),
            Op::Ori => self.write_reg(d.rd, a | imm),
            Op::Andi => self.write_reg(d.rd, a & imm),
            Op::Slli => self.write_reg(d.rd, a.wrapping_shl(imm)),
            Op::Srli => self.write_reg(d.rd, a.wrapping_shr(imm)),
            Op::Srai => self.write_reg(d.rd, ((a as i32).wrapping_shr(imm)) as u32),

            Op::Add => self.write_reg(d.rd, a.wrapping_add(b)),
            Op::Sub => self.write_reg(d.rd, a.wrapping_sub(b)),
            Op::Sll => self.write_reg(d.rd, a.wrapping_shl(b)),
            Op::Slt => self.write_reg(d.rd, ((a as i32) < (b as i32)) as u32),
            Op::Sltu => self.write_reg(d.rd, (a < b) as u32),
            Op::Xor => self.write_reg(d.rd, a ^ b),
            Op::Srl => self.write_reg(d.rd, a.wrapping_shr(b)),
            Op::Sra => self.write_reg(d.rd, ((a as i32).wrapping_shr(b)) as u32),
            Op::Or => self.write_reg(d.rd, a | b),
            Op::And => self.write_reg(d.rd, a & b),

            Op::Unknown => {}
        }

        self.pc = next_pc;
    }
}

fn taken(next_pc: &mut u32, pc: u32, imm: u32, cond: bool) {
    if cond {
        *next_pc = pc.wrapping_add(imm);
    }
}
