//! LR/SC and AMO execution.
//!
//! A single hart means the reservation protocol is exact: SC succeeds
//! only when it claims the reservation the preceding LR placed.

use pretty_assertions::assert_eq;

use crate::common::harness::{TestContext, RAM_BASE};

const ADDR: u64 = RAM_BASE + 0x100;

fn amo_ctx(words: &[u32]) -> TestContext {
    let mut ctx = TestContext::rv64().load_program(words);
    ctx.set_reg(12, ADDR);
    ctx
}

#[test]
fn amoadd_returns_the_old_value() {
    // amoadd.w a0,a1,(a2)
    let mut ctx = amo_ctx(&[0x00B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 40).expect("in ram");
    ctx.set_reg(11, 2);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 40);
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 42);
}

#[test]
fn amoswap_exchanges() {
    // amoswap.w a0,a1,(a2)
    let mut ctx = amo_ctx(&[0x08B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 7).expect("in ram");
    ctx.set_reg(11, 9);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 7);
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 9);
}

#[test]
fn amo_word_result_sign_extends() {
    let mut ctx = amo_ctx(&[0x00B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 0x8000_0000).expect("in ram");
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn lr_sc_pair_succeeds() {
    // lr.w a0,(a2) ; sc.w a0,a1,(a2)
    let mut ctx = amo_ctx(&[0x1006_252F, 0x18B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 5).expect("in ram");
    ctx.set_reg(11, 6);
    ctx.step_n(2);
    assert_eq!(ctx.reg(10), 0); // success
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 6);
}

#[test]
fn sc_without_reservation_fails() {
    // sc.w a0,a1,(a2)
    let mut ctx = amo_ctx(&[0x18B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 5).expect("in ram");
    ctx.set_reg(11, 6);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 1); // failure
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 5); // untouched
}

#[test]
fn reservation_is_single_use() {
    // lr.w ; sc.w ; sc.w — the second store conditional has nothing to claim
    let mut ctx = amo_ctx(&[0x1006_252F, 0x18B6_252F, 0x18B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 0).expect("in ram");
    ctx.set_reg(11, 1);
    ctx.step_n(3);
    assert_eq!(ctx.reg(10), 1);
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 1); // only the first sc stored
}

#[test]
fn doubleword_amo() {
    // amoadd.d a0,a1,(a2)
    let mut ctx = amo_ctx(&[0x00B6_352F]);
    ctx.cpu
        .mem
        .write_u64(ADDR, 0x1_0000_0000)
        .expect("in ram");
    ctx.set_reg(11, 1);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 0x1_0000_0000);
    assert_eq!(ctx.cpu.mem.peek_u64(ADDR), 0x1_0000_0001);
}

#[test]
fn amomax_is_signed() {
    // amomax.w a0,a1,(a2): -1 in memory vs 1 in a1
    let mut ctx = amo_ctx(&[0xA0B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 0xFFFF_FFFF).expect("in ram");
    ctx.set_reg(11, 1);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 1);

    // amomaxu.w sees the same memory value as a huge unsigned number
    let mut ctx = amo_ctx(&[0xE0B6_252F]);
    ctx.cpu.mem.write_u32(ADDR, 0xFFFF_FFFF).expect("in ram");
    ctx.set_reg(11, 1);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.mem.peek_u32(ADDR), 0xFFFF_FFFF);
}
