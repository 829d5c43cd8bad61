//! Branches, jumps, and linkage.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::{b_type, i_type, j_type};
use crate::common::harness::{TestContext, RAM_BASE};

const BRANCH: u32 = 0x63;

#[test]
fn jal_links_and_jumps() {
    let mut ctx = TestContext::rv64().load_program(&[j_type(0x6F, 1, 8)]);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 8);
    assert_eq!(ctx.reg(1), RAM_BASE + 4);
}

#[test]
fn jalr_clears_bit_zero_of_the_target() {
    // jalr ra, 1(a0)
    let mut ctx = TestContext::rv64().load_program(&[i_type(0x67, 1, 0, 10, 1)]);
    ctx.set_reg(10, RAM_BASE + 0x40);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 0x40); // bit 0 dropped
    assert_eq!(ctx.reg(1), RAM_BASE + 4);
}

#[rstest]
// funct3, a, b, taken
#[case(0, 5, 5, true)] // beq
#[case(1, 5, 5, false)] // bne
#[case(4, u64::MAX, 1, true)] // blt: -1 < 1
#[case(5, u64::MAX, 1, false)] // bge
#[case(6, u64::MAX, 1, false)] // bltu: huge unsigned
#[case(7, u64::MAX, 1, true)] // bgeu
fn branch_conditions(#[case] funct3: u32, #[case] a: u64, #[case] b: u64, #[case] taken: bool) {
    let mut ctx = TestContext::rv64().load_program(&[b_type(BRANCH, funct3, 11, 12, 16)]);
    ctx.set_reg(11, a);
    ctx.set_reg(12, b);
    ctx.step_n(1);
    let expect = if taken { RAM_BASE + 16 } else { RAM_BASE + 4 };
    assert_eq!(ctx.cpu.pc(), expect);
}

#[test]
fn backward_branch_forms_a_loop() {
    // a0 += 1 ; a1 -= 1 ; bne a1, zero, -8
    let mut ctx = TestContext::rv64().load_program(&[
        i_type(0x13, 10, 0, 10, 1),
        i_type(0x13, 11, 0, 11, -1),
        b_type(BRANCH, 1, 11, 0, -8),
    ]);
    ctx.set_reg(11, 3);
    ctx.step_n(9);
    assert_eq!(ctx.reg(10), 3);
    assert_eq!(ctx.reg(11), 0);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 12);
}

#[test]
fn fetch_of_unmapped_memory_faults() {
    let mut ctx = TestContext::rv64();
    ctx.cpu.set_pc(0x1000);
    let err = ctx.step().unwrap_err();
    assert!(matches!(err, rvemu_core::StepError::Memory { pc: 0x1000, .. }));
}
