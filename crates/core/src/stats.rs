//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the simulated core. It provides:
//! 1. **Cycle and IPC:** Total ticks, retired instructions, and derived CPI.
//! 2. **Instruction mix:** Counts by category (ALU, load, store, branch, jump).
//! 3. **Branch prediction:** Lookups, mispredictions, and accuracy.
//! 4. **Pipeline events:** Flush count and memory port transactions.
//!
//! The report is written to stderr: stdout is reserved for the architectural
//! result byte.

/// Statistics accumulated over a simulation run.
///
/// Counters are monotonic and live outside the clocked pipeline state, so
/// speculative work that is later flushed still shows up in the fetch-side
/// counters while `retired` only counts architecturally committed
/// instructions.
#[derive(Clone, Debug, Default)]
pub struct SimStats {
    /// Total simulator ticks elapsed.
    pub ticks: u64,
    /// Number of instructions committed (retired).
    pub retired: u64,

    /// Count of ALU (non-memory, non-control) instructions retired.
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of conditional branch instructions retired.
    pub inst_branch: u64,
    /// Count of JAL/JALR instructions retired.
    pub inst_jump: u64,

    /// Number of branch outcomes checked at commit.
    pub branch_lookups: u64,
    /// Number of correctly predicted branches.
    pub branch_hits: u64,

    /// Number of full-pipeline flushes (mispredicts and indirect jumps).
    pub flushes: u64,
    /// Cycles fetch stalled because the reorder buffer was full.
    pub fetch_stalls: u64,
    /// Number of load transactions issued to the memory port.
    pub mem_loads: u64,
    /// Number of store transactions issued to the memory port.
    pub mem_stores: u64,
}

impl SimStats {
    /// Branch prediction accuracy in percent, or 0.0 with no lookups.
    pub fn prediction_accuracy(&self) -> f64 {
        if self.branch_lookups == 0 {
            return 0.0;
        }
        100.0 * (self.branch_hits as f64 / self.branch_lookups as f64)
    }

    /// Cycles per retired instruction.
    ///
    /// Division is protected: a run that retired nothing reports CPI against
    /// a count of 1.
    pub fn cpi(&self) -> f64 {
        let retired = self.retired.max(1);
        self.ticks as f64 / retired as f64
    }

    /// Writes the formatted statistics block to stderr.
    pub fn report(&self) {
        eprintln!("==========================================================");
        eprintln!("OUT-OF-ORDER CORE SIMULATION STATISTICS");
        eprintln!("==========================================================");
        eprintln!("sim_ticks                {}", self.ticks);
        eprintln!("sim_insts                {}", self.retired);
        eprintln!("sim_cpi                  {:.4}", self.cpi());
        eprintln!("----------------------------------------------------------");
        eprintln!("INSTRUCTION MIX");
        let total = self.retired.max(1) as f64;
        let mix = |n: u64| (n as f64 / total) * 100.0;
        eprintln!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            mix(self.inst_alu)
        );
        eprintln!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            mix(self.inst_load)
        );
        eprintln!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            mix(self.inst_store)
        );
        eprintln!(
            "  op.branch              {} ({:.2}%)",
            self.inst_branch,
            mix(self.inst_branch)
        );
        eprintln!(
            "  op.jump                {} ({:.2}%)",
            self.inst_jump,
            mix(self.inst_jump)
        );
        eprintln!("----------------------------------------------------------");
        eprintln!("BRANCH PREDICTION");
        eprintln!("  bp.lookups             {}", self.branch_lookups);
        eprintln!(
            "  bp.mispredicts         {}",
            self.branch_lookups - self.branch_hits
        );
        eprintln!("  bp.accuracy            {:.2}%", self.prediction_accuracy());
        eprintln!("----------------------------------------------------------");
        eprintln!("PIPELINE");
        eprintln!("  flushes                {}", self.flushes);
        eprintln!("  fetch_stalls           {}", self.fetch_stalls);
        eprintln!("  mem.loads              {}", self.mem_loads);
        eprintln!("  mem.stores             {}", self.mem_stores);
        eprintln!("==========================================================");
    }
}
