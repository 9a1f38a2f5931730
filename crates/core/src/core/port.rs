//! Multi-cycle memory port.
//!
//! The port carries at most one load or store transaction at a time and
//! completes it after a fixed number of cycles. It provides:
//! 1. **Serialization:** Issue is only legal while the port is idle.
//! 2. **Completion Events:** The finished transaction is handed back to the
//!    pipeline, which applies its effect (slot wake-up or memory write).
//! 3. **Flush Semantics:** An in-flight load is speculative and can be
//!    cancelled; an in-flight store was issued by commit and must finish.

use crate::common::AccessWidth;

/// An in-flight memory transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transaction {
    /// A load issued for a reorder-buffer slot.
    Load {
        /// Slot awaiting the data.
        slot: usize,
        /// Effective address.
        addr: u32,
        /// Access width and extension mode.
        width: AccessWidth,
    },
    /// A store issued at commit.
    Store {
        /// Effective address.
        addr: u32,
        /// Value to write (low bytes per `width`).
        data: u32,
        /// Access width.
        width: AccessWidth,
    },
}

/// The memory port: one transaction, counted down cycle by cycle.
#[derive(Clone, Debug)]
pub struct MemPort {
    in_flight: Option<(Transaction, u64)>,
    latency: u64,
}

impl MemPort {
    /// Creates an idle port with the given per-transaction latency.
    pub fn new(latency: u64) -> Self {
        Self {
            in_flight: None,
            latency: latency.max(1),
        }
    }

    /// True when no transaction is in flight.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Begins a transaction.
    ///
    /// # Panics
    ///
    /// Panics if the port is busy; issuers check `is_idle` on the
    /// previous-cycle state first.
    pub fn issue(&mut self, tx: Transaction) {
        assert!(self.in_flight.is_none(), "memory port issued while busy");
        self.in_flight = Some((tx, self.latency));
    }

    /// Advances the port by one cycle.
    ///
    /// Returns the completed transaction on the cycle its countdown expires.
    pub fn tick(&mut self) -> Option<Transaction> {
        let (tx, cycles_left) = self.in_flight?;
        if cycles_left > 1 {
            self.in_flight = Some((tx, cycles_left - 1));
            None
        } else {
            self.in_flight = None;
            Some(tx)
        }
    }

    /// Cancels an in-flight load; its result would be speculative.
    ///
    /// A store is left untouched: stores are only issued from commit and are
    /// already architecturally authorized.
    pub fn cancel_load(&mut self) {
        if let Some((Transaction::Load { .. }, _)) = self.in_flight {
            self.in_flight = None;
        }
    }
}
