//! Equivalence laws: architectural state is independent of microarchitecture.
//!
//! The out-of-order core must agree with a plain in-order interpreter, and
//! its results must not depend on memory latency or predictor geometry;
//! those change tick counts only.

use ooosim_core::Config;

use crate::common::builder::{InstructionBuilder, HALT_WORD};
use crate::common::harness::TestContext;
use crate::common::reference::Reference;

fn inst() -> InstructionBuilder {
    InstructionBuilder::new()
}

/// A program exercising arithmetic, memory, a loop, and both jump kinds.
fn mixed_program() -> Vec<u32> {
    vec![
        inst().addi(1, 0, 10).build(),
        inst().addi(2, 0, 0).build(),
        inst().add(2, 2, 1).build(),   // loop body at 8
        inst().addi(1, 1, -1).build(),
        inst().bne(1, 0, -8).build(),
        inst().sw(0, 2, 0x100).build(),
        inst().lw(3, 0, 0x100).build(),
        inst().slli(4, 3, 1).build(),
        inst().sub(5, 4, 3).build(),
        inst().jal(6, 8).build(),
        HALT_WORD, // skipped by the jump
        inst().xori(10, 5, 0x0F).build(),
        HALT_WORD,
    ]
}

fn assert_same_architectural_state(program: &[u32]) {
    let mut oo = TestContext::load_program(program);
    let mut reference = Reference::load_program(program);

    let oo_result = oo.run_to_halt();
    let ref_result = reference.run_to_halt();
    assert_eq!(oo_result, ref_result, "result byte diverged");

    for reg in 0..32 {
        assert_eq!(
            oo.reg(reg),
            reference.reg(reg),
            "x{} diverged from the in-order reference",
            reg
        );
    }
    for addr in (0x100..0x110).step_by(4) {
        assert_eq!(oo.mem_u32(addr), reference.mem_u32(addr));
    }
}

#[test]
fn matches_in_order_reference() {
    assert_same_architectural_state(&mixed_program());
}

#[test]
fn matches_reference_on_store_load_traffic() {
    assert_same_architectural_state(&[
        inst().addi(1, 0, -123).build(),
        inst().sw(0, 1, 0x100).build(),
        inst().sh(0, 1, 0x104).build(),
        inst().sb(0, 1, 0x106).build(),
        inst().lw(4, 0, 0x100).build(),
        inst().lh(5, 0, 0x104).build(),
        inst().lbu(6, 0, 0x106).build(),
        inst().add(10, 5, 6).build(),
        HALT_WORD,
    ]);
}

#[test]
fn latency_changes_ticks_not_results() {
    let program = mixed_program();

    let mut fast_config = Config::default();
    fast_config.memory.access_latency = 3;
    let mut slow_config = Config::default();
    slow_config.memory.access_latency = 6;

    let mut fast = TestContext::with_config(fast_config, &program);
    let mut slow = TestContext::with_config(slow_config, &program);

    let fast_result = fast.run_to_halt();
    let slow_result = slow.run_to_halt();

    assert_eq!(fast_result, slow_result);
    for reg in 0..32 {
        assert_eq!(fast.reg(reg), slow.reg(reg));
    }
    assert!(
        slow.ticks() > fast.ticks(),
        "doubled latency must cost cycles"
    );
}

#[test]
fn predictor_geometry_changes_ticks_not_results() {
    let program = mixed_program();

    let mut tiny_config = Config::default();
    tiny_config.core.predictor_entries = 2;
    let mut large_config = Config::default();
    large_config.core.predictor_entries = 64;

    let mut tiny = TestContext::with_config(tiny_config, &program);
    let mut large = TestContext::with_config(large_config, &program);

    assert_eq!(tiny.run_to_halt(), large.run_to_halt());
    for reg in 0..32 {
        assert_eq!(tiny.reg(reg), large.reg(reg));
    }
}

#[test]
fn rob_depth_changes_ticks_not_results() {
    let program = mixed_program();

    let mut shallow_config = Config::default();
    shallow_config.core.rob_size = 4;

    let mut shallow = TestContext::with_config(shallow_config, &program);
    let mut deep = TestContext::load_program(&program);

    assert_eq!(shallow.run_to_halt(), deep.run_to_halt());
    for reg in 0..32 {
        assert_eq!(shallow.reg(reg), deep.reg(reg));
    }
}
