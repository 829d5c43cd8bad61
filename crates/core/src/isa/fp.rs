//! Shared floating-point helpers for the F and D modules.
//!
//! Host arithmetic is IEEE 754 round-to-nearest-even; the explicit
//! rounding-mode field is honoured where it changes the result class,
//! the float-to-integer conversions. Flag reporting covers the invalid
//! and divide-by-zero flags plus inexact on conversions; the inexact,
//! overflow and underflow flags of ordinary arithmetic are not modelled.

use crate::cpu::Cpu;

use super::rm;

pub(crate) const NX: u64 = 1 << 0;
pub(crate) const DZ: u64 = 1 << 3;
pub(crate) const NV: u64 = 1 << 4;

/// The effective rounding mode: the instruction's static field, or the
/// dynamic `frm` when the field holds 7.
pub(crate) fn effective_rm(cpu: &Cpu, ins: u32) -> u32 {
    match rm(ins) {
        7 => cpu.csr.frm() as u32,
        r => r,
    }
}

/// Rounds to an integer-valued float under the given mode.
pub(crate) fn round(val: f64, rm: u32) -> f64 {
    match rm {
        1 => val.trunc(),
        2 => val.floor(),
        3 => val.ceil(),
        4 => val.round(),
        _ => val.round_ties_even(),
    }
}

/// Converts to i32, saturating out-of-range and NaN inputs per the
/// standard's fixed results.
pub(crate) fn cvt_i32(cpu: &mut Cpu, val: f64, rm: u32) -> i32 {
    if val.is_nan() {
        cpu.csr.raise_fflags(NV);
        return i32::MAX;
    }
    let r = round(val, rm);
    if r < f64::from(i32::MIN) {
        cpu.csr.raise_fflags(NV);
        i32::MIN
    } else if r > f64::from(i32::MAX) {
        cpu.csr.raise_fflags(NV);
        i32::MAX
    } else {
        if r != val {
            cpu.csr.raise_fflags(NX);
        }
        r as i32
    }
}

/// Converts to u32, saturating.
pub(crate) fn cvt_u32(cpu: &mut Cpu, val: f64, rm: u32) -> u32 {
    if val.is_nan() {
        cpu.csr.raise_fflags(NV);
        return u32::MAX;
    }
    let r = round(val, rm);
    if r < 0.0 {
        cpu.csr.raise_fflags(NV);
        0
    } else if r > f64::from(u32::MAX) {
        cpu.csr.raise_fflags(NV);
        u32::MAX
    } else {
        if r != val {
            cpu.csr.raise_fflags(NX);
        }
        r as u32
    }
}

/// Converts to i64, saturating.
pub(crate) fn cvt_i64(cpu: &mut Cpu, val: f64, rm: u32) -> i64 {
    if val.is_nan() {
        cpu.csr.raise_fflags(NV);
        return i64::MAX;
    }
    let r = round(val, rm);
    // 2^63 is exactly representable; i64::MAX is not
    if r < -(2f64.powi(63)) {
        cpu.csr.raise_fflags(NV);
        i64::MIN
    } else if r >= 2f64.powi(63) {
        cpu.csr.raise_fflags(NV);
        i64::MAX
    } else {
        if r != val {
            cpu.csr.raise_fflags(NX);
        }
        r as i64
    }
}

/// Converts to u64, saturating.
pub(crate) fn cvt_u64(cpu: &mut Cpu, val: f64, rm: u32) -> u64 {
    if val.is_nan() {
        cpu.csr.raise_fflags(NV);
        return u64::MAX;
    }
    let r = round(val, rm);
    if r < 0.0 {
        cpu.csr.raise_fflags(NV);
        0
    } else if r >= 2f64.powi(64) {
        cpu.csr.raise_fflags(NV);
        u64::MAX
    } else {
        if r != val {
            cpu.csr.raise_fflags(NX);
        }
        r as u64
    }
}

pub(crate) fn is_snan32(bits: u32) -> bool {
    let exp_all_ones = bits & 0x7F80_0000 == 0x7F80_0000;
    let mantissa = bits & 0x007F_FFFF;
    exp_all_ones && mantissa != 0 && bits & 0x0040_0000 == 0
}

pub(crate) fn is_snan64(bits: u64) -> bool {
    let exp_all_ones = bits & 0x7FF0_0000_0000_0000 == 0x7FF0_0000_0000_0000;
    let mantissa = bits & 0x000F_FFFF_FFFF_FFFF;
    exp_all_ones && mantissa != 0 && bits & 0x0008_0000_0000_0000 == 0
}

/// The ten FCLASS categories, as the bit index to set.
pub(crate) fn classify(sign: bool, is_inf: bool, is_nan: bool, is_snan: bool, is_zero: bool, is_subnormal: bool) -> u64 {
    let bit = if is_nan {
        if is_snan { 8 } else { 9 }
    } else if sign {
        match (is_inf, is_zero, is_subnormal) {
            (true, _, _) => 0,
            (_, true, _) => 3,
            (_, _, true) => 2,
            _ => 1,
        }
    } else {
        match (is_inf, is_zero, is_subnormal) {
            (true, _, _) => 7,
            (_, true, _) => 4,
            (_, _, true) => 5,
            _ => 6,
        }
    };
    1 << bit
}
