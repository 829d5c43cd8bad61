//! Multiply and divide execution.
//!
//! Division never traps: division by zero and signed overflow produce
//! the architecturally defined results instead.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::r_type;
use crate::common::harness::TestContext;

const OP: u32 = 0x33;
const OP_32: u32 = 0x3B;
const MULDIV: u32 = 1;

fn run_op(word: u32, a: u64, b: u64) -> u64 {
    let mut ctx = TestContext::rv64().load_program(&[word]);
    ctx.set_reg(11, a);
    ctx.set_reg(12, b);
    ctx.step_n(1);
    ctx.reg(10)
}

fn run_op_rv32(word: u32, a: u64, b: u64) -> u64 {
    let mut ctx = TestContext::rv32().load_program(&[word]);
    ctx.set_reg(11, a);
    ctx.set_reg(12, b);
    ctx.step_n(1);
    ctx.reg(10)
}

#[test]
fn widening_multiply() {
    let mul = r_type(OP, 10, 0, 11, 12, MULDIV);
    let mulh = r_type(OP, 10, 1, 11, 12, MULDIV);
    let mulhu = r_type(OP, 10, 3, 11, 12, MULDIV);

    assert_eq!(run_op(mul, 7, 6), 42);
    // (-1) * (-1): high half is 0 signed, huge unsigned
    assert_eq!(run_op(mulh, u64::MAX, u64::MAX), 0);
    assert_eq!(run_op(mulhu, u64::MAX, u64::MAX), u64::MAX - 1);
    // rv32 high halves come from the 64-bit product
    assert_eq!(run_op_rv32(mulh, 0x4000_0000, 4), 1);
}

#[rstest]
#[case(4, 100, 7, 14)] // div
#[case(4, 100, 0, u64::MAX)] // div by zero => -1
#[case(5, 100, 0, u64::MAX)] // divu by zero => all ones
#[case(6, 100, 7, 2)] // rem
#[case(6, 100, 0, 100)] // rem by zero => dividend
#[case(7, 100, 0, 100)] // remu by zero => dividend
fn division_edge_cases(#[case] funct3: u32, #[case] a: u64, #[case] b: u64, #[case] out: u64) {
    let word = r_type(OP, 10, funct3, 11, 12, MULDIV);
    assert_eq!(run_op(word, a, b), out);
}

#[test]
fn signed_overflow_wraps() {
    // i64::MIN / -1 overflows; the result is the dividend, remainder 0
    let div = r_type(OP, 10, 4, 11, 12, MULDIV);
    let rem = r_type(OP, 10, 6, 11, 12, MULDIV);
    assert_eq!(run_op(div, i64::MIN as u64, u64::MAX), i64::MIN as u64);
    assert_eq!(run_op(rem, i64::MIN as u64, u64::MAX), 0);

    // the rv32 equivalent at word width
    assert_eq!(
        run_op_rv32(div, 0x8000_0000, u64::MAX),
        0xFFFF_FFFF_8000_0000
    );
}

#[test]
fn word_width_ops_on_rv64() {
    let mulw = r_type(OP_32, 10, 0, 11, 12, MULDIV);
    let divw = r_type(OP_32, 10, 4, 11, 12, MULDIV);
    let remuw = r_type(OP_32, 10, 7, 11, 12, MULDIV);

    // the product overflows 32 bits; the upper word is discarded
    assert_eq!(run_op(mulw, 0x8000_0000, 2), 0);
    // divw ignores the upper operand halves
    assert_eq!(run_op(divw, 0xFFFF_FFFF_0000_0064, 10), 10);
    // remuw treats the words as unsigned
    assert_eq!(run_op(remuw, 0xFFFF_FFFF, 0x8000_0001), 0x7FFF_FFFE);
}
