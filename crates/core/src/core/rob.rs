//! Reorder buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer tracking every in-flight instruction from
//! fetch through retirement. It provides:
//! 1. **Allocation:** Fetch claims the tail slot; the slot index doubles as
//!    the rename handle for the register alias file.
//! 2. **Result Broadcast:** Completed slots hold their results; dependent
//!    slots adopt them during operand wake-up.
//! 3. **In-order Commit:** Only the head slot retires, in program order.
//! 4. **Load Ordering:** A query for uncommitted stores ahead of a load.
//! 5. **Flush:** Squashing every entry after a misprediction or indirect
//!    jump.

use crate::isa::Op;

/// A source operand: either a resolved 32-bit value or a dependency on the
/// reorder-buffer slot that will produce it.
///
/// Resolved values persist in the entry after execution so commit can read
/// them back (the JALR target and store address/data are materialized at
/// commit from the operand fields).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A resolved value.
    Value(u32),
    /// A dependency on another ROB slot's result.
    Pending(usize),
}

impl Default for Operand {
    fn default() -> Self {
        Operand::Value(0)
    }
}

impl Operand {
    /// The resolved value, if any.
    #[inline]
    pub fn value(self) -> Option<u32> {
        match self {
            Operand::Value(v) => Some(v),
            Operand::Pending(_) => None,
        }
    }

    /// True once the operand carries a value.
    #[inline]
    pub fn is_resolved(self) -> bool {
        matches!(self, Operand::Value(_))
    }
}

/// Lifecycle state of a ROB slot.
///
/// ALU operations go `Fetched → Ready`; loads go `Fetched → Issued → Ready`;
/// stores go `Fetched → Ready → Committing`. Any state is squashed to empty
/// by a flush.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SlotState {
    /// Allocated; operands may still be pending.
    #[default]
    Fetched,
    /// Load sent to the memory port, awaiting completion.
    Issued,
    /// Result available (or store operands resolved); eligible to commit.
    Ready,
    /// Store transaction in flight at the memory port; head is held.
    Committing,
}

/// A single entry in the reorder buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobEntry {
    /// Whether this entry occupies its slot.
    pub valid: bool,
    /// Current lifecycle state.
    pub state: SlotState,
    /// Decoded operation.
    pub op: Op,
    /// Source operands, resolved at fetch or by wake-up.
    pub operands: [Operand; 2],
    /// Sign-extended immediate.
    pub imm: i32,
    /// Architectural destination register (0 when none).
    pub dest: usize,
    /// ALU/load result, branch outcome (0/1), or link value.
    pub result: u32,
    /// Recorded branch prediction.
    pub predicted_taken: bool,
    /// Fetch PC of this instruction.
    pub pc: u32,
    /// Halt sentinel marker.
    pub halt: bool,
}

impl RobEntry {
    /// True once the instruction has produced its result.
    ///
    /// A `Committing` store has passed through `Ready` already; its slot
    /// still counts as complete for dependents (stores have none).
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SlotState::Ready | SlotState::Committing)
    }
}

/// Reorder buffer: circular slot array with head and tail cursors.
///
/// The valid slots always form a contiguous range from head to tail (mod
/// capacity); the buffer is empty when the head slot is invalid and full when
/// the tail slot is valid.
#[derive(Clone, Debug)]
pub struct Rob {
    slots: Vec<RobEntry>,
    head: usize,
    tail: usize,
}

impl Rob {
    /// Creates an empty ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![RobEntry::default(); capacity],
            head: 0,
            tail: 0,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the oldest entry (commit point).
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Index where the next entry will be allocated.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// True when the tail slot is free, i.e. fetch can admit an instruction.
    #[inline]
    pub fn can_allocate(&self) -> bool {
        !self.slots[self.tail].valid
    }

    /// True when no entry is in flight.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.slots[self.head].valid
    }

    /// Returns the entry at `idx`.
    #[inline]
    pub fn entry(&self, idx: usize) -> &RobEntry {
        &self.slots[idx]
    }

    /// Returns the entry at `idx` mutably.
    #[inline]
    pub fn entry_mut(&mut self, idx: usize) -> &mut RobEntry {
        &mut self.slots[idx]
    }

    /// Writes `entry` into the tail slot and advances the tail.
    ///
    /// Returns the claimed slot index, which stays stable until the entry
    /// retires or is flushed and therefore serves as the rename handle.
    ///
    /// # Panics
    ///
    /// Panics if the tail slot is still occupied; fetch checks
    /// `can_allocate` first.
    pub fn allocate(&mut self, entry: RobEntry) -> usize {
        assert!(
            !self.slots[self.tail].valid,
            "allocation into occupied slot {}",
            self.tail
        );
        let slot = self.tail;
        self.slots[slot] = entry;
        self.slots[slot].valid = true;
        self.tail = (self.tail + 1) % self.slots.len();
        slot
    }

    /// Returns the head entry if it is valid.
    pub fn head_entry(&self) -> Option<&RobEntry> {
        let entry = &self.slots[self.head];
        entry.valid.then_some(entry)
    }

    /// Retires the head entry: invalidates the slot and advances the head.
    pub fn retire_head(&mut self) {
        debug_assert!(self.slots[self.head].valid, "retiring an empty head");
        self.slots[self.head].valid = false;
        self.head = (self.head + 1) % self.slots.len();
    }

    /// Squashes every entry and resets both cursors.
    pub fn flush(&mut self) {
        for slot in &mut self.slots {
            slot.valid = false;
        }
        self.head = 0;
        self.tail = 0;
    }

    /// The completed result of slot `idx`, if it is valid and has one.
    ///
    /// This is the result-broadcast read used both by rename (a source whose
    /// producer already finished) and by operand wake-up.
    pub fn result_of(&self, idx: usize) -> Option<u32> {
        let entry = &self.slots[idx];
        (entry.valid && entry.is_complete()).then_some(entry.result)
    }

    /// Indices of all valid entries, oldest first.
    pub fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        let mut idx = self.head;
        let mut remaining = self.capacity();
        std::iter::from_fn(move || {
            if remaining == 0 || !self.slots[idx].valid {
                return None;
            }
            let current = idx;
            idx = (idx + 1) % self.capacity();
            remaining -= 1;
            Some(current)
        })
    }

    /// True if any uncommitted store sits between the head and `load_slot`.
    ///
    /// Loads must not issue past earlier stores; the walk runs in program
    /// order from the head up to, but not including, the load's own slot.
    ///
    /// # Panics
    ///
    /// Panics if the walk crosses an invalid slot: the valid range is
    /// contiguous by construction, so that would be a simulator bug.
    pub fn store_ahead_of(&self, load_slot: usize) -> bool {
        let mut idx = self.head;
        while idx != load_slot {
            let entry = &self.slots[idx];
            assert!(entry.valid, "store-ordering walk hit empty slot {}", idx);
            if entry.op.is_store() {
                return true;
            }
            idx = (idx + 1) % self.capacity();
        }
        false
    }
}
