//! Floating point execution.
//!
//! Covers arithmetic, the NaN rules (canonicalization, quiet vs
//! signaling compares), saturating conversions, and NaN-boxing of
//! single-precision values in the 64-bit register file.

use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

const QNAN32: u32 = 0x7FC0_0000;
const SNAN32: u32 = 0x7F80_0001;

// fflags bits
const NX: u64 = 1;
const DZ: u64 = 8;
const NV: u64 = 16;

#[test]
fn single_precision_arithmetic() {
    // fadd.s ft0, ft1, ft2
    let mut ctx = TestContext::rv64().load_program(&[0x0020_8053]);
    ctx.cpu.wr_f32(1, 1.25);
    ctx.cpu.wr_f32(2, 2.5);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32(0), 3.75);
    assert_eq!(ctx.cpu.csr.fflags(), 0);
}

#[test]
fn sqrt_and_fused_multiply_add() {
    // fsqrt.s ft0, ft1 ; fmadd.s ft0, ft1, ft2, ft3
    let mut ctx = TestContext::rv64().load_program(&[0x5800_8053]);
    ctx.cpu.wr_f32(1, 4.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32(0), 2.0);

    let mut ctx = TestContext::rv64().load_program(&[0x1820_8043]);
    ctx.cpu.wr_f32(1, 2.0);
    ctx.cpu.wr_f32(2, 3.0);
    ctx.cpu.wr_f32(3, 1.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32(0), 7.0);
}

#[test]
fn division_by_zero_raises_dz() {
    // fdiv.s ft0, ft1, ft2
    let mut ctx = TestContext::rv64().load_program(&[0x1820_8053]);
    ctx.cpu.wr_f32(1, 1.0);
    ctx.cpu.wr_f32(2, 0.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32(0), f32::INFINITY);
    assert_eq!(ctx.cpu.csr.fflags(), DZ);
}

#[test]
fn nan_results_are_canonical() {
    // fadd.s with a signaling NaN input produces the canonical quiet NaN
    let mut ctx = TestContext::rv64().load_program(&[0x0020_8053]);
    ctx.cpu.wr_f32_bits(1, SNAN32);
    ctx.cpu.wr_f32(2, 1.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32_bits(0), QNAN32);
    assert_eq!(ctx.cpu.csr.fflags() & NV, NV);
}

#[test]
fn unboxed_input_reads_as_nan() {
    // ft1 holds a double, not a boxed single; fadd.s must see NaN
    let mut ctx = TestContext::rv64().load_program(&[0x0020_8053]);
    ctx.cpu.wr_f64(1, 1.0);
    ctx.cpu.wr_f32(2, 1.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32_bits(0), QNAN32);
}

#[test]
fn min_orders_negative_zero_first() {
    // fmin.s ft0, ft1, ft2 ; fmax.s ft3 variant in a second run
    let mut ctx = TestContext::rv64().load_program(&[0x2820_8053]);
    ctx.cpu.wr_f32(1, -0.0);
    ctx.cpu.wr_f32(2, 0.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32_bits(0), 0x8000_0000); // -0.0

    let mut ctx = TestContext::rv64().load_program(&[0x2820_9053]);
    ctx.cpu.wr_f32(1, -0.0);
    ctx.cpu.wr_f32(2, 0.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32_bits(0), 0); // +0.0
}

#[test]
fn compares_are_quiet_or_signaling() {
    // feq.s a0, ft1, ft2 with a quiet NaN: false, no flags
    let mut ctx = TestContext::rv64().load_program(&[0xA020_A553]);
    ctx.cpu.wr_f32_bits(1, QNAN32);
    ctx.cpu.wr_f32(2, 1.0);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 0);
    assert_eq!(ctx.cpu.csr.fflags(), 0);

    // feq.s with a signaling NaN raises NV
    let mut ctx = TestContext::rv64().load_program(&[0xA020_A553]);
    ctx.cpu.wr_f32_bits(1, SNAN32);
    ctx.cpu.wr_f32(2, 1.0);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.csr.fflags(), NV);

    // flt.s raises NV on any NaN, quiet included
    let mut ctx = TestContext::rv64().load_program(&[0xA020_9553]);
    ctx.cpu.wr_f32_bits(1, QNAN32);
    ctx.cpu.wr_f32(2, 1.0);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 0);
    assert_eq!(ctx.cpu.csr.fflags(), NV);
}

#[test]
fn conversions_truncate_and_saturate() {
    // fcvt.w.s a0, ft1, rtz
    let word = 0xC000_9553;

    let mut ctx = TestContext::rv64().load_program(&[word]);
    ctx.cpu.wr_f32(1, -1.75);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10) as i64, -1);
    assert_eq!(ctx.cpu.csr.fflags(), NX); // inexact: the fraction was dropped

    let mut ctx = TestContext::rv64().load_program(&[word]);
    ctx.cpu.wr_f32(1, 3.0e9); // above i32::MAX
    ctx.step_n(1);
    assert_eq!(ctx.reg(10) as i64, i64::from(i32::MAX));
    assert_eq!(ctx.cpu.csr.fflags(), NV);

    let mut ctx = TestContext::rv64().load_program(&[word]);
    ctx.cpu.wr_f32_bits(1, QNAN32);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10) as i64, i64::from(i32::MAX)); // NaN converts to max
    assert_eq!(ctx.cpu.csr.fflags(), NV);
}

#[test]
fn integer_to_float_and_back() {
    // fcvt.s.w ft0, a0 ; fcvt.w.s a1, ft0
    let mut ctx = TestContext::rv64().load_program(&[0xD005_0053, 0xC000_05D3]);
    ctx.set_reg(10, u64::MAX); // -1 as a word
    ctx.step_n(2);
    assert_eq!(ctx.cpu.rd_f32(0), -1.0);
    assert_eq!(ctx.reg(11) as i64, -1);
}

#[test]
fn fclass_bits() {
    // fclass.s a0, ft1
    let cases: [(u32, u64); 4] = [
        (f32::NEG_INFINITY.to_bits(), 1),       // bit 0
        (0x0000_0000, 1 << 4),                  // +0.0
        (1.0f32.to_bits(), 1 << 6),             // positive normal
        (QNAN32, 1 << 9),                       // quiet NaN
    ];
    for (bits, class) in cases {
        let mut ctx = TestContext::rv64().load_program(&[0xE000_9553]);
        ctx.cpu.wr_f32_bits(1, bits);
        ctx.step_n(1);
        assert_eq!(ctx.reg(10), class, "fclass of {bits:#010x}");
    }
}

#[test]
fn double_precision_and_width_conversions() {
    // fadd.d ft0, ft1, ft2
    let mut ctx = TestContext::rv64().load_program(&[0x0220_8053]);
    ctx.cpu.wr_f64(1, 1.0e300);
    ctx.cpu.wr_f64(2, 2.0e300);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f64(0), 3.0e300);

    // fcvt.d.s ft0, ft1 widens exactly
    let mut ctx = TestContext::rv64().load_program(&[0x4200_8053]);
    ctx.cpu.wr_f32(1, 1.5);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f64(0), 1.5);

    // fcvt.s.d of a NaN narrows to the canonical single NaN, boxed
    let mut ctx = TestContext::rv64().load_program(&[0x4010_8053]);
    ctx.cpu.wr_f64(1, f64::NAN);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.rd_f32_bits(0), QNAN32);
}

#[test]
fn moves_are_bit_exact() {
    // fmv.w.x ft0, a0 ; fmv.x.w a1, ft0
    let mut ctx = TestContext::rv64().load_program(&[0xF005_0053, 0xE000_05D3]);
    ctx.set_reg(10, 0x8000_0001);
    ctx.step_n(2);
    assert_eq!(ctx.cpu.rd_f32_bits(0), 0x8000_0001);
    // the word moves back sign extended
    assert_eq!(ctx.reg(11), 0xFFFF_FFFF_8000_0001);

    // fmv.d.x / fmv.x.d round trip the full register
    let mut ctx = TestContext::rv64().load_program(&[0xF205_0053, 0xE200_05D3]);
    ctx.set_reg(10, 0x0123_4567_89AB_CDEF);
    ctx.step_n(2);
    assert_eq!(ctx.reg(11), 0x0123_4567_89AB_CDEF);
}
