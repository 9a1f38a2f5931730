//! Fetch / decode / rename stage.
//!
//! Each cycle this stage admits at most one instruction: it reads the word at
//! the architectural PC, decodes it, resolves its source operands against the
//! alias file (renaming them to a producer slot when the value is still in
//! flight), claims the destination register, predicts the next PC, and writes
//! the tail reorder-buffer slot.

use log::trace;

use crate::core::rob::{Operand, RobEntry};
use crate::core::CoreState;
use crate::isa::{decode, Op};
use crate::mem::SparseMemory;
use crate::stats::SimStats;

/// Runs the fetch stage for one cycle.
///
/// Stalls (without side effects) while the tail slot is occupied. All reads
/// go to `cur`: an instruction fetched this cycle sees the alias file as it
/// stood at the start of the cycle, which is sound because at most one
/// instruction is admitted per cycle.
pub(crate) fn fetch(cur: &CoreState, next: &mut CoreState, mem: &SparseMemory, stats: &mut SimStats) {
    if !cur.rob.can_allocate() {
        stats.fetch_stalls += 1;
        return;
    }

    let word = mem.read_u32(cur.pc);
    let decoded = decode(word);
    let slot = cur.rob.tail();

    let mut entry = RobEntry {
        op: decoded.op,
        imm: decoded.imm,
        pc: cur.pc,
        halt: decoded.halt,
        ..Default::default()
    };

    if decoded.op.reads_rs1() {
        entry.operands[0] = rename_read(cur, decoded.rs1);
    }
    if decoded.op.reads_rs2() {
        entry.operands[1] = rename_read(cur, decoded.rs2);
    }

    // The halt sentinel decodes as an ADDI but retires as a pure marker, so
    // it never claims its destination.
    if decoded.op.writes_dest() && decoded.rd != 0 && !decoded.halt {
        entry.dest = decoded.rd;
        next.regs.set_producer(decoded.rd, slot);
    }

    next.pc = if decoded.op.is_branch() {
        entry.predicted_taken = cur.bpred.predict(cur.pc);
        if entry.predicted_taken {
            cur.pc.wrapping_add(decoded.imm as u32)
        } else {
            cur.pc.wrapping_add(4)
        }
    } else if decoded.op == Op::Jal {
        cur.pc.wrapping_add(decoded.imm as u32)
    } else {
        // JALR resolves its target at commit and flushes there.
        cur.pc.wrapping_add(4)
    };

    trace!(
        "fetch: pc {:#010x} {:?} -> slot {}",
        cur.pc,
        decoded.op,
        slot
    );
    next.rob.allocate(entry);
}

/// Resolves one source register against the previous-cycle rename state.
///
/// A register without a producer reads its committed value. A pending
/// register reads its producer's result if that slot already completed, and
/// otherwise becomes a dependency on the slot.
fn rename_read(cur: &CoreState, rs: usize) -> Operand {
    let alias = cur.regs.get(rs);
    match alias.producer {
        None => Operand::Value(alias.value),
        Some(slot) => {
            debug_assert!(
                cur.rob.entry(slot).valid && cur.rob.entry(slot).dest == rs,
                "alias for x{} names slot {} which does not produce it",
                rs,
                slot
            );
            match cur.rob.result_of(slot) {
                Some(value) => Operand::Value(value),
                None => Operand::Pending(slot),
            }
        }
    }
}
