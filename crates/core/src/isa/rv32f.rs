//! The F standard extension: single-precision floating point.
//!
//! Single-precision values live NaN-boxed in the 64-bit FP registers;
//! the boxing checks happen in the register accessors. Any NaN result is
//! canonicalised to the standard's quiet NaN.

use crate::cpu::{Cpu, StepError};

use super::fp::{self, NV};
use super::{disasm, imm_i, imm_s, rd, rs1, rs2, rs3, InsnDefn, IsaModule, WordLen};

pub(crate) const QNAN32: u32 = 0x7FC0_0000;

fn canonical(val: f32) -> f32 {
    if val.is_nan() {
        f32::from_bits(QNAN32)
    } else {
        val
    }
}

fn check_snan2(cpu: &mut Cpu, a: u32, b: u32) {
    if fp::is_snan32(a) || fp::is_snan32(b) {
        cpu.csr.raise_fflags(NV);
    }
}

fn flw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins));
    let val = cpu.load_u32(addr)?;
    cpu.wr_f32_bits(rd(ins), val);
    cpu.advance(4);
    Ok(())
}

fn fsw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_s(ins));
    cpu.store_u32(addr, cpu.rd_f32_bits(rs2(ins)))?;
    cpu.advance(4);
    Ok(())
}

fn fused(cpu: &mut Cpu, ins: u32, negate_product: bool, negate_addend: bool) {
    let a = cpu.rd_f32(rs1(ins));
    let b = cpu.rd_f32(rs2(ins));
    let c = cpu.rd_f32(rs3(ins));
    let (a, c) = (
        if negate_product { -a } else { a },
        if negate_addend { -c } else { c },
    );
    let val = a.mul_add(b, c);
    if val.is_nan() && !a.is_nan() && !b.is_nan() && !c.is_nan() {
        cpu.csr.raise_fflags(NV);
    }
    cpu.wr_f32(rd(ins), canonical(val));
    cpu.advance(4);
}

fn fmadd_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, false, false);
    Ok(())
}

fn fmsub_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, false, true);
    Ok(())
}

fn fnmsub_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, true, false);
    Ok(())
}

fn fnmadd_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, true, true);
    Ok(())
}

fn arith(cpu: &mut Cpu, ins: u32, op: fn(f32, f32) -> f32) {
    let a = cpu.rd_f32(rs1(ins));
    let b = cpu.rd_f32(rs2(ins));
    check_snan2(cpu, a.to_bits(), b.to_bits());
    let val = op(a, b);
    if val.is_nan() && !a.is_nan() && !b.is_nan() {
        cpu.csr.raise_fflags(NV);
    }
    cpu.wr_f32(rd(ins), canonical(val));
    cpu.advance(4);
}

fn fadd_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    arith(cpu, ins, |a, b| a + b);
    Ok(())
}

fn fsub_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    arith(cpu, ins, |a, b| a - b);
    Ok(())
}

fn fmul_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    arith(cpu, ins, |a, b| a * b);
    Ok(())
}

fn fdiv_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_f32(rs1(ins));
    let b = cpu.rd_f32(rs2(ins));
    if b == 0.0 && a.is_finite() && a != 0.0 {
        cpu.csr.raise_fflags(fp::DZ);
    }
    arith(cpu, ins, |a, b| a / b);
    Ok(())
}

fn fsqrt_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_f32(rs1(ins));
    if a < 0.0 || fp::is_snan32(a.to_bits()) {
        cpu.csr.raise_fflags(NV);
    }
    cpu.wr_f32(rd(ins), canonical(a.sqrt()));
    cpu.advance(4);
    Ok(())
}

fn sign_inject(cpu: &mut Cpu, ins: u32, op: fn(u32, u32) -> u32) {
    let a = cpu.rd_f32_bits(rs1(ins));
    let b = cpu.rd_f32_bits(rs2(ins));
    cpu.wr_f32_bits(rd(ins), op(a, b));
    cpu.advance(4);
}

fn fsgnj_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    sign_inject(cpu, ins, |a, b| a & 0x7FFF_FFFF | b & 0x8000_0000);
    Ok(())
}

fn fsgnjn_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    sign_inject(cpu, ins, |a, b| a & 0x7FFF_FFFF | !b & 0x8000_0000);
    Ok(())
}

fn fsgnjx_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    sign_inject(cpu, ins, |a, b| a ^ b & 0x8000_0000);
    Ok(())
}

fn min_max(cpu: &mut Cpu, ins: u32, want_min: bool) {
    let a = cpu.rd_f32_bits(rs1(ins));
    let b = cpu.rd_f32_bits(rs2(ins));
    check_snan2(cpu, a, b);
    let (fa, fb) = (f32::from_bits(a), f32::from_bits(b));
    let out = match (fa.is_nan(), fb.is_nan()) {
        (true, true) => QNAN32,
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            // -0.0 orders below +0.0
            let a_first = if fa == fb {
                (a >> 31 == 1) == want_min
            } else {
                (fa < fb) == want_min
            };
            if a_first {
                a
            } else {
                b
            }
        }
    };
    cpu.wr_f32_bits(rd(ins), out);
    cpu.advance(4);
}

fn fmin_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    min_max(cpu, ins, true);
    Ok(())
}

fn fmax_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    min_max(cpu, ins, false);
    Ok(())
}

fn fcvt_w_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = f64::from(cpu.rd_f32(rs1(ins)));
    let out = fp::cvt_i32(cpu, val, rm);
    cpu.wr_x(rd(ins), out as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn fcvt_wu_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = f64::from(cpu.rd_f32(rs1(ins)));
    let out = fp::cvt_u32(cpu, val, rm);
    // sign-extended like every word-width result
    cpu.wr_x(rd(ins), out as i32 as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn fmv_x_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let raw = cpu.rd_f_raw(rs1(ins)) as u32;
    cpu.wr_x(rd(ins), raw as i32 as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn compare(cpu: &mut Cpu, ins: u32, op: fn(f32, f32) -> bool, quiet: bool) {
    let a = cpu.rd_f32(rs1(ins));
    let b = cpu.rd_f32(rs2(ins));
    let result = if a.is_nan() || b.is_nan() {
        // FEQ raises NV only for signaling NaNs; FLT/FLE for any NaN
        if !quiet || fp::is_snan32(a.to_bits()) || fp::is_snan32(b.to_bits()) {
            cpu.csr.raise_fflags(NV);
        }
        false
    } else {
        op(a, b)
    };
    cpu.wr_x(rd(ins), u64::from(result));
    cpu.advance(4);
}

fn feq_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    compare(cpu, ins, |a, b| a == b, true);
    Ok(())
}

fn flt_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    compare(cpu, ins, |a, b| a < b, false);
    Ok(())
}

fn fle_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    compare(cpu, ins, |a, b| a <= b, false);
    Ok(())
}

fn fclass_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let bits = cpu.rd_f32_bits(rs1(ins));
    let val = f32::from_bits(bits);
    let mask = fp::classify(
        bits >> 31 == 1,
        val.is_infinite(),
        val.is_nan(),
        fp::is_snan32(bits),
        val == 0.0,
        val.is_subnormal(),
    );
    cpu.wr_x(rd(ins), mask);
    cpu.advance(4);
    Ok(())
}

fn fcvt_s_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)) as i32;
    cpu.wr_f32(rd(ins), val as f32);
    cpu.advance(4);
    Ok(())
}

fn fcvt_s_wu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)) as u32;
    cpu.wr_f32(rd(ins), val as f32);
    cpu.advance(4);
    Ok(())
}

fn fmv_w_x(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_f32_bits(rd(ins), cpu.rd_x(rs1(ins)) as u32);
    cpu.advance(4);
    Ok(())
}

/// Single-precision floating point.
pub static RV32F: IsaModule = IsaModule {
    name: "rv32f",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "imm[11:0] rs1 010 rd 0000111 FLW", da: disasm::f_load, emu: flw },
        InsnDefn { template: "imm[11:5] rs2 rs1 010 imm[4:0] 0100111 FSW", da: disasm::f_store, emu: fsw },
        InsnDefn { template: "rs3 00 rs2 rs1 rm rd 1000011 FMADD.S", da: disasm::f_r4_type, emu: fmadd_s },
        InsnDefn { template: "rs3 00 rs2 rs1 rm rd 1000111 FMSUB.S", da: disasm::f_r4_type, emu: fmsub_s },
        InsnDefn { template: "rs3 00 rs2 rs1 rm rd 1001011 FNMSUB.S", da: disasm::f_r4_type, emu: fnmsub_s },
        InsnDefn { template: "rs3 00 rs2 rs1 rm rd 1001111 FNMADD.S", da: disasm::f_r4_type, emu: fnmadd_s },
        InsnDefn { template: "0000000 rs2 rs1 rm rd 1010011 FADD.S", da: disasm::f_r_type, emu: fadd_s },
        InsnDefn { template: "0000100 rs2 rs1 rm rd 1010011 FSUB.S", da: disasm::f_r_type, emu: fsub_s },
        InsnDefn { template: "0001000 rs2 rs1 rm rd 1010011 FMUL.S", da: disasm::f_r_type, emu: fmul_s },
        InsnDefn { template: "0001100 rs2 rs1 rm rd 1010011 FDIV.S", da: disasm::f_r_type, emu: fdiv_s },
        InsnDefn { template: "0101100 00000 rs1 rm rd 1010011 FSQRT.S", da: disasm::f_unary, emu: fsqrt_s },
        InsnDefn { template: "0010000 rs2 rs1 000 rd 1010011 FSGNJ.S", da: disasm::f_r_type, emu: fsgnj_s },
        InsnDefn { template: "0010000 rs2 rs1 001 rd 1010011 FSGNJN.S", da: disasm::f_r_type, emu: fsgnjn_s },
        InsnDefn { template: "0010000 rs2 rs1 010 rd 1010011 FSGNJX.S", da: disasm::f_r_type, emu: fsgnjx_s },
        InsnDefn { template: "0010100 rs2 rs1 000 rd 1010011 FMIN.S", da: disasm::f_r_type, emu: fmin_s },
        InsnDefn { template: "0010100 rs2 rs1 001 rd 1010011 FMAX.S", da: disasm::f_r_type, emu: fmax_s },
        InsnDefn { template: "1100000 00000 rs1 rm rd 1010011 FCVT.W.S", da: disasm::f_to_x, emu: fcvt_w_s },
        InsnDefn { template: "1100000 00001 rs1 rm rd 1010011 FCVT.WU.S", da: disasm::f_to_x, emu: fcvt_wu_s },
        InsnDefn { template: "1110000 00000 rs1 000 rd 1010011 FMV.X.W", da: disasm::f_to_x, emu: fmv_x_w },
        InsnDefn { template: "1010000 rs2 rs1 010 rd 1010011 FEQ.S", da: disasm::f_cmp, emu: feq_s },
        InsnDefn { template: "1010000 rs2 rs1 001 rd 1010011 FLT.S", da: disasm::f_cmp, emu: flt_s },
        InsnDefn { template: "1010000 rs2 rs1 000 rd 1010011 FLE.S", da: disasm::f_cmp, emu: fle_s },
        InsnDefn { template: "1110000 00000 rs1 001 rd 1010011 FCLASS.S", da: disasm::f_to_x, emu: fclass_s },
        InsnDefn { template: "1101000 00000 rs1 rm rd 1010011 FCVT.S.W", da: disasm::x_to_f, emu: fcvt_s_w },
        InsnDefn { template: "1101000 00001 rs1 rm rd 1010011 FCVT.S.WU", da: disasm::x_to_f, emu: fcvt_s_wu },
        InsnDefn { template: "1111000 00000 rs1 000 rd 1010011 FMV.W.X", da: disasm::x_to_f, emu: fmv_w_x },
    ],
};
