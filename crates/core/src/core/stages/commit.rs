//! Commit stage.
//!
//! Each cycle this stage examines the head of the reorder buffer and, when
//! the instruction there has completed, makes its effects architectural:
//! register write-back, store issue to the memory port, predictor training,
//! and the flush decision for mispredicted branches and indirect jumps.

use log::{debug, trace};

use crate::core::port::Transaction;
use crate::core::rob::{Operand, SlotState};
use crate::core::{CoreState, RETURN_REGISTER};
use crate::isa::Op;
use crate::stats::SimStats;

/// Runs the commit stage for one cycle.
///
/// `store_done` is true when the memory port completed a store transaction
/// this cycle; the committing store at the head retires on that event.
pub(crate) fn commit(cur: &CoreState, next: &mut CoreState, store_done: bool, stats: &mut SimStats) {
    let Some(head) = cur.rob.head_entry() else {
        return;
    };
    let head_slot = cur.rob.head();

    match head.state {
        SlotState::Committing => {
            // The store's transaction is in flight; the head is held until
            // the port reports completion.
            if store_done {
                next.rob.retire_head();
                stats.retired += 1;
                stats.inst_store += 1;
                trace!("commit: slot {} {:?} retired", head_slot, head.op);
            }
            return;
        }
        SlotState::Ready => {}
        SlotState::Fetched | SlotState::Issued => return,
    }

    if head.halt {
        next.halted = true;
        next.return_value = (cur.regs.value(RETURN_REGISTER) & 0xFF) as u8;
        next.rob.retire_head();
        stats.retired += 1;
        debug!("halt retired: return value {}", next.return_value);
        return;
    }

    if head.op.is_store() {
        if !cur.port.is_idle() {
            return;
        }
        let (addr, data) = store_operands(head.operands, head.imm);
        next.port.issue(Transaction::Store {
            addr,
            data,
            width: head.op.access_width(),
        });
        next.rob.entry_mut(head_slot).state = SlotState::Committing;
        stats.mem_stores += 1;
        trace!("commit: slot {} {:?} -> store {:#010x}", head_slot, head.op, addr);
        return;
    }

    if head.op.is_branch() {
        let taken = head.result != 0;
        next.bpred.train(head.pc, taken);
        stats.branch_lookups += 1;
        if taken == head.predicted_taken {
            stats.branch_hits += 1;
        } else {
            next.flushing = true;
            next.flush_pc = if taken {
                head.pc.wrapping_add(head.imm as u32)
            } else {
                head.pc.wrapping_add(4)
            };
            stats.flushes += 1;
            debug!(
                "mispredict at {:#010x}: taken={} predicted={}",
                head.pc, taken, head.predicted_taken
            );
        }
        next.rob.retire_head();
        stats.retired += 1;
        stats.inst_branch += 1;
        return;
    }

    // Register writers: ALU results, load data, and jump link values.
    if head.dest != 0 {
        next.regs.write_value(head.dest, head.result);
        next.regs.release_producer(head.dest, head_slot);
    }

    if head.op == Op::Jalr {
        // JALR is never predicted; the resolved target always redirects.
        let base = match head.operands[0] {
            Operand::Value(value) => value,
            Operand::Pending(slot) => {
                panic!("JALR committed with operand pending on slot {}", slot)
            }
        };
        next.flushing = true;
        next.flush_pc = base.wrapping_add(head.imm as u32);
        stats.flushes += 1;
    }

    next.rob.retire_head();
    stats.retired += 1;
    match head.op {
        Op::Jal | Op::Jalr => stats.inst_jump += 1,
        op if op.is_load() => stats.inst_load += 1,
        _ => stats.inst_alu += 1,
    }
    trace!("commit: slot {} {:?} retired", head_slot, head.op);
}

/// Materializes a store's effective address and data from its operands.
///
/// Both operands are resolved by the time the store reaches `Ready`.
fn store_operands(operands: [Operand; 2], imm: i32) -> (u32, u32) {
    match (operands[0], operands[1]) {
        (Operand::Value(base), Operand::Value(data)) => {
            (base.wrapping_add(imm as u32), data)
        }
        _ => panic!("store committed with unresolved operands"),
    }
}
