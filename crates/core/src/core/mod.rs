//! The out-of-order core.
//!
//! This module wires the pipeline components into a clocked core. It
//! provides:
//! 1. **Clocked Staging:** All pipeline state lives in a `CoreState` held as
//!    a (current, next) pair; stages read the current cell and write the next
//!    one, and the tick boundary publishes next as current. Every component
//!    therefore observes only the previous cycle's state.
//! 2. **Stage Orchestration:** Per tick, the memory port advances, then
//!    commit, execute, and fetch run; their relative order is observable only
//!    where two stages write the same next cell, and fetch runs last so a
//!    re-claimed alias entry keeps its newest producer.
//! 3. **Flush Protocol:** When a retired branch mispredicted or an indirect
//!    jump resolved, the following cycle squashes all speculative state and
//!    redirects fetch; no other work happens on that cycle.

use log::{debug, trace};

use crate::config::Config;
use crate::core::alias::RegisterAliasFile;
use crate::core::bru::BimodalPredictor;
use crate::core::port::{MemPort, Transaction};
use crate::core::rob::{Rob, SlotState};
use crate::mem::SparseMemory;
use crate::stats::SimStats;

/// Register alias file.
pub mod alias;
/// Bimodal branch predictor.
pub mod bru;
/// Multi-cycle memory port.
pub mod port;
/// Reorder buffer.
pub mod rob;
/// Pipeline stages (fetch, execute, commit).
mod stages;

/// Architectural register holding the return value (x10 / a0).
pub(crate) const RETURN_REGISTER: usize = 10;

/// All clocked pipeline state.
///
/// Cloned wholesale at the start of every tick; the clone is the "next" cell
/// the stages write into. Nothing outside this struct is registered: main
/// memory is written only by architecturally authorized transactions, and
/// statistics are monotonic counters.
#[derive(Clone, Debug)]
pub(crate) struct CoreState {
    /// Architectural fetch PC.
    pub pc: u32,
    /// Register alias file (committed values + pending producers).
    pub regs: RegisterAliasFile,
    /// Reorder buffer.
    pub rob: Rob,
    /// Branch predictor table.
    pub bpred: BimodalPredictor,
    /// Memory port.
    pub port: MemPort,
    /// A flush is pending for the next cycle.
    pub flushing: bool,
    /// PC to resume fetching from after the flush.
    pub flush_pc: u32,
    /// The halt sentinel has retired.
    pub halted: bool,
    /// Low byte of x10 captured at halt.
    pub return_value: u8,
}

impl CoreState {
    fn new(config: &Config) -> Self {
        Self {
            pc: 0,
            regs: RegisterAliasFile::new(),
            rob: Rob::new(config.core.rob_size),
            bpred: BimodalPredictor::new(config.core.predictor_entries),
            port: MemPort::new(config.memory.access_latency),
            flushing: false,
            flush_pc: 0,
            halted: false,
            return_value: 0,
        }
    }
}

/// The simulated core: clocked pipeline state over a flat memory.
pub struct Core {
    cur: CoreState,
    mem: SparseMemory,
    stats: SimStats,
}

impl Core {
    /// Creates a core over a loaded memory image, fetching from address 0.
    pub fn new(config: &Config, mem: SparseMemory) -> Self {
        Self {
            cur: CoreState::new(config),
            mem,
            stats: SimStats::default(),
        }
    }

    /// Advances the core by one clock cycle.
    pub fn tick(&mut self) {
        let mut next = self.cur.clone();
        self.stats.ticks += 1;

        if self.cur.flushing {
            self.flush_cycle(&mut next);
            self.cur = next;
            return;
        }

        // The memory port advances first; a completion this cycle applies to
        // next-state (the slot wakes, or memory is written) and frees the
        // port for issues in the following cycle.
        let mut store_done = false;
        if let Some(tx) = next.port.tick() {
            match tx {
                Transaction::Load { slot, addr, width } => {
                    let data = self.mem.load(addr, width);
                    let entry = next.rob.entry_mut(slot);
                    debug_assert!(entry.valid && entry.state == SlotState::Issued);
                    entry.result = data;
                    entry.state = SlotState::Ready;
                    trace!("load done: slot {} addr {:#010x} -> {:#x}", slot, addr, data);
                }
                Transaction::Store { addr, data, width } => {
                    self.mem.store(addr, data, width);
                    store_done = true;
                    trace!("store done: addr {:#010x} <- {:#x}", addr, data);
                }
            }
        }

        stages::commit(&self.cur, &mut next, store_done, &mut self.stats);
        stages::execute(&self.cur, &mut next, &mut self.stats);
        stages::fetch(&self.cur, &mut next, &self.mem, &mut self.stats);

        self.cur = next;
    }

    /// Performs the global clear after a misprediction or indirect jump.
    ///
    /// All speculative state goes: the ROB empties, every alias producer is
    /// dropped, and an in-flight load is cancelled. An in-flight store was
    /// issued from commit and is architecturally authorized, so it keeps
    /// counting down and its write still lands. Fetch resumes from the
    /// recorded flush PC on the following cycle.
    fn flush_cycle(&mut self, next: &mut CoreState) {
        next.rob.flush();
        next.regs.clear_producers();
        next.pc = self.cur.flush_pc;
        next.flushing = false;
        next.port.cancel_load();
        if let Some(Transaction::Store { addr, data, width }) = next.port.tick() {
            self.mem.store(addr, data, width);
        }
        debug!("flush: resume at {:#010x}", self.cur.flush_pc);
    }

    /// True once the halt sentinel has retired.
    #[inline]
    pub fn halted(&self) -> bool {
        self.cur.halted
    }

    /// Low byte of x10, captured when the halt sentinel retired.
    #[inline]
    pub fn return_value(&self) -> u8 {
        self.cur.return_value
    }

    /// Committed value of an architectural register.
    #[inline]
    pub fn reg(&self, idx: usize) -> u32 {
        self.cur.regs.value(idx)
    }

    /// Current architectural fetch PC.
    #[inline]
    pub fn pc(&self) -> u32 {
        self.cur.pc
    }

    /// The memory image, including all committed stores.
    #[inline]
    pub fn memory(&self) -> &SparseMemory {
        &self.mem
    }

    /// Accumulated statistics.
    #[inline]
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }
}
