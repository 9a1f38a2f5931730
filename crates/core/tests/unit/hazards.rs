//! Hazard and boundary behavior tests.

use ooosim_core::Config;

use crate::common::builder::{InstructionBuilder, HALT_WORD};
use crate::common::harness::TestContext;

fn inst() -> InstructionBuilder {
    InstructionBuilder::new()
}

#[test]
fn raw_hazard_costs_one_cycle() {
    // A consumer fetched back-to-back with its producer wakes up the cycle
    // after the producer's result is latched and computes the cycle after
    // that: exactly one tick more than an independent instruction.
    let mut dependent = TestContext::load_program(&[
        inst().addi(1, 0, 5).build(),
        inst().add(2, 1, 1).build(),
        HALT_WORD,
    ]);
    let mut independent = TestContext::load_program(&[
        inst().addi(1, 0, 5).build(),
        inst().addi(2, 0, 10).build(),
        HALT_WORD,
    ]);

    dependent.run_to_halt();
    independent.run_to_halt();
    assert_eq!(dependent.reg(2), 10);
    assert_eq!(independent.reg(2), 10);
    assert_eq!(dependent.ticks(), independent.ticks() + 1);
}

#[test]
fn dependency_chain_resolves_in_order() {
    let mut tc = TestContext::load_program(&[
        inst().addi(1, 0, 1).build(),
        inst().add(2, 1, 1).build(),
        inst().add(3, 2, 2).build(),
        inst().add(4, 3, 3).build(),
        inst().add(10, 4, 4).build(),
        HALT_WORD,
    ]);
    assert_eq!(tc.run_to_halt(), 16);
}

#[test]
fn rob_full_stalls_fetch_but_not_commit() {
    // A two-entry buffer forces fetch to wait for retirements, but the
    // program still drains to the correct result.
    let mut config = Config::default();
    config.core.rob_size = 2;
    let mut tc = TestContext::with_config(
        config,
        &[
            inst().addi(1, 0, 1).build(),
            inst().addi(2, 0, 2).build(),
            inst().addi(3, 0, 3).build(),
            inst().addi(4, 0, 4).build(),
            inst().add(5, 1, 2).build(),
            inst().add(6, 3, 4).build(),
            inst().add(10, 5, 6).build(),
            HALT_WORD,
        ],
    );
    assert_eq!(tc.run_to_halt(), 10);
    assert!(tc.stats().fetch_stalls > 0, "fetch must have stalled");
}

#[test]
fn write_after_write_keeps_newest_value() {
    // Two in-flight writers of x1; the reader must see the second.
    let mut tc = TestContext::load_program(&[
        inst().addi(1, 0, 11).build(),
        inst().addi(1, 0, 22).build(),
        inst().addi(10, 1, 0).build(),
        HALT_WORD,
    ]);
    assert_eq!(tc.run_to_halt(), 22);
    assert_eq!(tc.reg(1), 22);
}

#[test]
fn flushed_store_never_reaches_memory() {
    // The branch is taken, so the store on the fall-through path is
    // speculative and must leave no architectural trace.
    let mut tc = TestContext::load_program(&[
        inst().addi(1, 0, 7).build(),
        inst().beq(0, 0, 12).build(),
        inst().sw(0, 1, 0x200).build(),
        inst().addi(10, 0, 1).build(),
        inst().addi(10, 0, 2).build(), // branch target
        HALT_WORD,
    ]);
    assert_eq!(tc.run_to_halt(), 2);
    assert_eq!(tc.mem_u32(0x200), 0, "speculative store must be squashed");
}

#[test]
fn flushed_register_write_never_commits() {
    let mut tc = TestContext::load_program(&[
        inst().beq(0, 0, 8).build(),
        inst().addi(7, 0, 99).build(),
        inst().addi(10, 0, 3).build(), // branch target
        HALT_WORD,
    ]);
    assert_eq!(tc.run_to_halt(), 3);
    assert_eq!(tc.reg(7), 0, "speculative write must be squashed");
}

#[test]
fn loads_wait_for_earlier_stores() {
    // Store and load to the same address in adjacent slots; forwarding does
    // not exist, so the load must observe the committed store.
    let mut tc = TestContext::load_program(&[
        inst().addi(1, 0, 0x55).build(),
        inst().sw(0, 1, 0x300).build(),
        inst().lw(2, 0, 0x300).build(),
        inst().addi(1, 0, 0x66).build(),
        inst().sw(0, 1, 0x300).build(),
        inst().lw(10, 0, 0x300).build(),
        HALT_WORD,
    ]);
    assert_eq!(tc.run_to_halt(), 0x66);
    assert_eq!(tc.reg(2), 0x55);
}

#[test]
fn predictor_learns_taken_loop() {
    // After the first mispredict, the backward branch should be predicted
    // taken; only the first and last iterations miss.
    let mut tc = TestContext::load_program(&[
        inst().addi(5, 0, 8).build(),
        inst().addi(5, 5, -1).build(), // loop body at 4
        inst().bne(5, 0, -4).build(),
        inst().addi(10, 0, 1).build(),
        HALT_WORD,
    ]);
    assert_eq!(tc.run_to_halt(), 1);
    let stats = tc.stats();
    assert_eq!(stats.branch_lookups, 8);
    assert_eq!(
        stats.branch_hits,
        6,
        "8 iterations should mispredict exactly twice"
    );
}
