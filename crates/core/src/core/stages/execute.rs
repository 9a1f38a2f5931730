//! Issue / execute stage.
//!
//! Each cycle this stage walks the in-flight instructions in program order.
//! For every slot whose operands are still renamed, it adopts results that
//! completed last cycle (the broadcast of the result bus). A fully resolved
//! non-load may then compute on the single ALU; a fully resolved load may
//! issue to the memory port once no earlier store remains uncommitted.

use log::trace;

use crate::core::port::Transaction;
use crate::core::rob::{Operand, SlotState};
use crate::core::CoreState;
use crate::isa::Op;
use crate::stats::SimStats;

/// Runs the issue/execute stage for one cycle.
pub(crate) fn execute(cur: &CoreState, next: &mut CoreState, stats: &mut SimStats) {
    let mut alu_free = true;

    for idx in cur.rob.occupied() {
        let entry = cur.rob.entry(idx);
        if entry.state != SlotState::Fetched {
            continue;
        }

        // Operand wake-up against previous-cycle results. The woken values
        // land in next-state only: dispatch below reads the latched operands,
        // so a dependent instruction computes the cycle after its wake-up.
        for (pos, operand) in entry.operands.iter().enumerate() {
            if let Operand::Pending(producer) = *operand {
                if let Some(value) = cur.rob.result_of(producer) {
                    next.rob.entry_mut(idx).operands[pos] = Operand::Value(value);
                }
            }
        }

        let resolved = match (entry.operands[0], entry.operands[1]) {
            (Operand::Value(a), Operand::Value(b)) => Some((a, b)),
            _ => None,
        };
        let Some((lhs, rhs)) = resolved else {
            continue;
        };

        if entry.op.is_load() {
            // Loads wait for every earlier store to leave the buffer, then
            // for the port; the port check reads previous-cycle occupancy and
            // also guards against an issue made earlier this same cycle.
            if cur.port.is_idle() && next.port.is_idle() && !cur.rob.store_ahead_of(idx) {
                let addr = lhs.wrapping_add(entry.imm as u32);
                next.port.issue(Transaction::Load {
                    slot: idx,
                    addr,
                    width: entry.op.access_width(),
                });
                next.rob.entry_mut(idx).state = SlotState::Issued;
                stats.mem_loads += 1;
                trace!("issue: slot {} load {:#010x}", idx, addr);
            }
        } else if alu_free {
            alu_free = false;
            let result = compute(entry.op, lhs, rhs, entry.imm, entry.pc);
            let slot = next.rob.entry_mut(idx);
            slot.result = result;
            slot.state = SlotState::Ready;
            trace!("execute: slot {} {:?} -> {:#x}", idx, entry.op, result);
        }
    }
}

/// Computes an RV32I result on two's-complement 32-bit values.
///
/// Branches produce their outcome (1 taken, 0 not taken); jumps produce the
/// link value; stores produce nothing (their address and data are read from
/// the operand fields at commit). Register-shift amounts are taken modulo 32.
fn compute(op: Op, a: u32, b: u32, imm: i32, pc: u32) -> u32 {
    let imm_u = imm as u32;
    match op {
        Op::Lui => imm_u,
        Op::Auipc => pc.wrapping_add(imm_u),
        Op::Jal | Op::Jalr => pc.wrapping_add(4),

        Op::Beq => (a == b) as u32,
        Op::Bne => (a != b) as u32,
        Op::Blt => ((a as i32) < (b as i32)) as u32,
        Op::Bge => ((a as i32) >= (b as i32)) as u32,
        Op::Bltu => (a < b) as u32,
        Op::Bgeu => (a >= b) as u32,

        Op::Addi => a.wrapping_add(imm_u),
        Op::Slti => ((a as i32) < imm) as u32,
        Op::Sltiu => (a < imm_u) as u32,
        Op::Xori => a ^ imm_u,
        Op::Ori => a | imm_u,
        Op::Andi => a & imm_u,
        Op::Slli => a.wrapping_shl(imm_u),
        Op::Srli => a.wrapping_shr(imm_u),
        Op::Srai => ((a as i32).wrapping_shr(imm_u)) as u32,

        Op::Add => a.wrapping_add(b),
        Op::Sub => a.wrapping_sub(b),
        Op::Sll => a.wrapping_shl(b),
        Op::Slt => ((a as i32) < (b as i32)) as u32,
        Op::Sltu => (a < b) as u32,
        Op::Xor => a ^ b,
        Op::Srl => a.wrapping_shr(b),
        Op::Sra => ((a as i32).wrapping_shr(b)) as u32,
        Op::Or => a | b,
        Op::And => a & b,

        Op::Sb | Op::Sh | Op::Sw => 0,
        Op::Lb | Op::Lh | Op::Lw | Op::Lbu | Op::Lhu | Op::Unknown => {
            unreachable!("{:?} does not execute on the ALU", op)
        }
    }
}
