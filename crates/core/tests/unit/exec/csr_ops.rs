//! CSR instruction semantics.

use pretty_assertions::assert_eq;
use rvemu_core::common::PrivMode;
use rvemu_core::csr::addr;
use rvemu_core::StepError;

use crate::common::harness::{TestContext, RAM_BASE};

#[test]
fn csrrw_swaps() {
    // csrrw a0, mscratch, a1
    let mut ctx = TestContext::rv64().load_program(&[0x3405_9573]);
    ctx.cpu.csr.write(addr::MSCRATCH, 0xAA).expect("writable");
    ctx.set_reg(11, 0xBB);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 0xAA);
    assert_eq!(ctx.cpu.csr.read(addr::MSCRATCH).expect("readable"), 0xBB);
}

#[test]
fn csrrs_with_x0_only_reads() {
    // rdcycle a0 (csrrs a0, cycle, x0) — cycle is read-only, so the
    // rs1 == x0 form must skip the write entirely
    let mut ctx = TestContext::rv64().load_program(&[0xC000_2573]);
    ctx.cpu.csr.cycle = 41;
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 41); // read happens before the increment
    assert_eq!(ctx.cpu.csr.cycle, 42);
}

#[test]
fn csr_immediate_forms() {
    // csrrwi a0, mscratch, 5 ; csrrsi zero, mscratch, 2 ; csrrci zero, mscratch, 1
    let mut ctx = TestContext::rv64().load_program(&[0x3402_D573, 0x3401_6073, 0x3400_F073]);
    ctx.step_n(3);
    assert_eq!(ctx.reg(10), 0);
    assert_eq!(
        ctx.cpu.csr.read(addr::MSCRATCH).expect("readable"),
        (5 | 2) & !1
    );
}

#[test]
fn user_mode_cannot_touch_machine_csrs() {
    // csrrw a0, mstatus, a1
    let mut ctx = TestContext::rv64().load_program(&[0x3005_9573]);
    ctx.cpu.csr.set_mode(PrivMode::User);
    let err = ctx.step().unwrap_err();
    assert!(matches!(err, StepError::Csr { pc, .. } if pc == RAM_BASE));
}

#[test]
fn counters_track_steps_and_retires() {
    // nop ; <illegal> — the failed step costs a cycle but retires nothing
    let mut ctx = TestContext::rv64().load_program(&[0x0000_0013, 0xFFFF_FFFF]);
    ctx.step_n(1);
    assert!(ctx.step().is_err());
    assert_eq!(ctx.cpu.csr.cycle, 2);
    assert_eq!(ctx.cpu.csr.instret, 1);
}

#[test]
fn fflags_reach_the_fcsr_view() {
    // fdiv.s ft0, ft1, ft2 with ft2 = 0 raises DZ; read back via csrrs
    let mut ctx = TestContext::rv64().load_program(&[0x1820_8053, 0x0010_2573]);
    ctx.cpu.wr_f32(1, 1.0);
    ctx.cpu.wr_f32(2, 0.0);
    ctx.step_n(2);
    assert_eq!(ctx.reg(10), 8); // DZ
}
