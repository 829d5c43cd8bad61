//! The D standard extension: double-precision floating point.

use crate::cpu::{Cpu, StepError};

use super::fp::{self, NV};
use super::{disasm, imm_i, imm_s, rd, rs1, rs2, rs3, InsnDefn, IsaModule, WordLen};

pub(crate) const QNAN64: u64 = 0x7FF8_0000_0000_0000;

fn canonical(val: f64) -> f64 {
    if val.is_nan() {
        f64::from_bits(QNAN64)
    } else {
        val
    }
}

fn check_snan2(cpu: &mut Cpu, a: u64, b: u64) {
    if fp::is_snan64(a) || fp::is_snan64(b) {
        cpu.csr.raise_fflags(NV);
    }
}

fn fld(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins));
    let val = cpu.load_u64(addr)?;
    cpu.wr_f_raw(rd(ins), val);
    cpu.advance(4);
    Ok(())
}

fn fsd(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_s(ins));
    cpu.store_u64(addr, cpu.rd_f_raw(rs2(ins)))?;
    cpu.advance(4);
    Ok(())
}

fn fused(cpu: &mut Cpu, ins: u32, negate_product: bool, negate_addend: bool) {
    let a = cpu.rd_f64(rs1(ins));
    let b = cpu.rd_f64(rs2(ins));
    let c = cpu.rd_f64(rs3(ins));
    let (a, c) = (
        if negate_product { -a } else { a },
        if negate_addend { -c } else { c },
    );
    let val = a.mul_add(b, c);
    if val.is_nan() && !a.is_nan() && !b.is_nan() && !c.is_nan() {
        cpu.csr.raise_fflags(NV);
    }
    cpu.wr_f64(rd(ins), canonical(val));
    cpu.advance(4);
}

fn fmadd_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, false, false);
    Ok(())
}

fn fmsub_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, false, true);
    Ok(())
}

fn fnmsub_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, true, false);
    Ok(())
}

fn fnmadd_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    fused(cpu, ins, true, true);
    Ok(())
}

fn arith(cpu: &mut Cpu, ins: u32, op: fn(f64, f64) -> f64) {
    let a = cpu.rd_f64(rs1(ins));
    let b = cpu.rd_f64(rs2(ins));
    check_snan2(cpu, a.to_bits(), b.to_bits());
    let val = op(a, b);
    if val.is_nan() && !a.is_nan() && !b.is_nan() {
        cpu.csr.raise_fflags(NV);
    }
    cpu.wr_f64(rd(ins), canonical(val));
    cpu.advance(4);
}

fn fadd_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    arith(cpu, ins, |a, b| a + b);
    Ok(())
}

fn fsub_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    arith(cpu, ins, |a, b| a - b);
    Ok(())
}

fn fmul_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    arith(cpu, ins, |a, b| a * b);
    Ok(())
}

fn fdiv_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_f64(rs1(ins));
    let b = cpu.rd_f64(rs2(ins));
    if b == 0.0 && a.is_finite() && a != 0.0 {
        cpu.csr.raise_fflags(fp::DZ);
    }
    arith(cpu, ins, |a, b| a / b);
    Ok(())
}

fn fsqrt_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_f64(rs1(ins));
    if a < 0.0 || fp::is_snan64(a.to_bits()) {
        cpu.csr.raise_fflags(NV);
    }
    cpu.wr_f64(rd(ins), canonical(a.sqrt()));
    cpu.advance(4);
    Ok(())
}

fn sign_inject(cpu: &mut Cpu, ins: u32, op: fn(u64, u64) -> u64) {
    let a = cpu.rd_f_raw(rs1(ins));
    let b = cpu.rd_f_raw(rs2(ins));
    cpu.wr_f_raw(rd(ins), op(a, b));
    cpu.advance(4);
}

fn fsgnj_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    sign_inject(cpu, ins, |a, b| a & !(1 << 63) | b & 1 << 63);
    Ok(())
}

fn fsgnjn_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    sign_inject(cpu, ins, |a, b| a & !(1 << 63) | !b & 1 << 63);
    Ok(())
}

fn fsgnjx_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    sign_inject(cpu, ins, |a, b| a ^ b & 1 << 63);
    Ok(())
}

fn min_max(cpu: &mut Cpu, ins: u32, want_min: bool) {
    let a = cpu.rd_f_raw(rs1(ins));
    let b = cpu.rd_f_raw(rs2(ins));
    check_snan2(cpu, a, b);
    let (fa, fb) = (f64::from_bits(a), f64::from_bits(b));
    let out = match (fa.is_nan(), fb.is_nan()) {
        (true, true) => QNAN64,
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            let a_first = if fa == fb {
                (a >> 63 == 1) == want_min
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
    cpu.wr_f_raw(rd(ins), out);
    cpu.advance(4);
}

fn fmin_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    min_max(cpu, ins, true);
    Ok(())
}

fn fmax_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    min_max(cpu, ins, false);
    Ok(())
}

fn fcvt_s_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_f64(rs1(ins)) as f32;
    let val = if val.is_nan() {
        f32::from_bits(super::rv32f::QNAN32)
    } else {
        val
    };
    cpu.wr_f32(rd(ins), val);
    cpu.advance(4);
    Ok(())
}

fn fcvt_d_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = f64::from(cpu.rd_f32(rs1(ins)));
    cpu.wr_f64(rd(ins), canonical(val));
    cpu.advance(4);
    Ok(())
}

fn compare(cpu: &mut Cpu, ins: u32, op: fn(f64, f64) -> bool, quiet: bool) {
    let a = cpu.rd_f64(rs1(ins));
    let b = cpu.rd_f64(rs2(ins));
    let result = if a.is_nan() || b.is_nan() {
        if !quiet || fp::is_snan64(a.to_bits()) || fp::is_snan64(b.to_bits()) {
            cpu.csr.raise_fflags(NV);
        }
        false
    } else {
        op(a, b)
    };
    cpu.wr_x(rd(ins), u64::from(result));
    cpu.advance(4);
}

fn feq_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    compare(cpu, ins, |a, b| a == b, true);
    Ok(())
}

fn flt_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    compare(cpu, ins, |a, b| a < b, false);
    Ok(())
}

fn fle_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    compare(cpu, ins, |a, b| a <= b, false);
    Ok(())
}

fn fclass_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let bits = cpu.rd_f_raw(rs1(ins));
    let val = f64::from_bits(bits);
    let mask = fp::classify(
        bits >> 63 == 1,
        val.is_infinite(),
        val.is_nan(),
        fp::is_snan64(bits),
        val == 0.0,
        val.is_subnormal(),
    );
    cpu.wr_x(rd(ins), mask);
    cpu.advance(4);
    Ok(())
}

fn fcvt_w_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = cpu.rd_f64(rs1(ins));
    let out = fp::cvt_i32(cpu, val, rm);
    cpu.wr_x(rd(ins), out as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn fcvt_wu_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = cpu.rd_f64(rs1(ins));
    let out = fp::cvt_u32(cpu, val, rm);
    cpu.wr_x(rd(ins), out as i32 as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn fcvt_d_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)) as i32;
    cpu.wr_f64(rd(ins), f64::from(val));
    cpu.advance(4);
    Ok(())
}

fn fcvt_d_wu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)) as u32;
    cpu.wr_f64(rd(ins), f64::from(val));
    cpu.advance(4);
    Ok(())
}

/// Double-precision floating point.
pub static RV32D: IsaModule = IsaModule {
    name: "rv32d",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "imm[11:0] rs1 011 rd 0000111 FLD", da: disasm::f_load, emu: fld },
        InsnDefn { template: "imm[11:5] rs2 rs1 011 imm[4:0] 0100111 FSD", da: disasm::f_store, emu: fsd },
        InsnDefn { template: "rs3 01 rs2 rs1 rm rd 1000011 FMADD.D", da: disasm::f_r4_type, emu: fmadd_d },
        InsnDefn { template: "rs3 01 rs2 rs1 rm rd 1000111 FMSUB.D", da: disasm::f_r4_type, emu: fmsub_d },
        InsnDefn { template: "rs3 01 rs2 rs1 rm rd 1001011 FNMSUB.D", da: disasm::f_r4_type, emu: fnmsub_d },
        InsnDefn { template: "rs3 01 rs2 rs1 rm rd 1001111 FNMADD.D", da: disasm::f_r4_type, emu: fnmadd_d },
        InsnDefn { template: "0000001 rs2 rs1 rm rd 1010011 FADD.D", da: disasm::f_r_type, emu: fadd_d },
        InsnDefn { template: "0000101 rs2 rs1 rm rd 1010011 FSUB.D", da: disasm::f_r_type, emu: fsub_d },
        InsnDefn { template: "0001001 rs2 rs1 rm rd 1010011 FMUL.D", da: disasm::f_r_type, emu: fmul_d },
        InsnDefn { template: "0001101 rs2 rs1 rm rd 1010011 FDIV.D", da: disasm::f_r_type, emu: fdiv_d },
        InsnDefn { template: "0101101 00000 rs1 rm rd 1010011 FSQRT.D", da: disasm::f_unary, emu: fsqrt_d },
        InsnDefn { template: "0010001 rs2 rs1 000 rd 1010011 FSGNJ.D", da: disasm::f_r_type, emu: fsgnj_d },
        InsnDefn { template: "0010001 rs2 rs1 001 rd 1010011 FSGNJN.D", da: disasm::f_r_type, emu: fsgnjn_d },
        InsnDefn { template: "0010001 rs2 rs1 010 rd 1010011 FSGNJX.D", da: disasm::f_r_type, emu: fsgnjx_d },
        InsnDefn { template: "0010101 rs2 rs1 000 rd 1010011 FMIN.D", da: disasm::f_r_type, emu: fmin_d },
        InsnDefn { template: "0010101 rs2 rs1 001 rd 1010011 FMAX.D", da: disasm::f_r_type, emu: fmax_d },
        InsnDefn { template: "0100000 00001 rs1 rm rd 1010011 FCVT.S.D", da: disasm::f_unary, emu: fcvt_s_d },
        InsnDefn { template: "0100001 00000 rs1 rm rd 1010011 FCVT.D.S", da: disasm::f_unary, emu: fcvt_d_s },
        InsnDefn { template: "1010001 rs2 rs1 010 rd 1010011 FEQ.D", da: disasm::f_cmp, emu: feq_d },
        InsnDefn { template: "1010001 rs2 rs1 001 rd 1010011 FLT.D", da: disasm::f_cmp, emu: flt_d },
        InsnDefn { template: "1010001 rs2 rs1 000 rd 1010011 FLE.D", da: disasm::f_cmp, emu: fle_d },
        InsnDefn { template: "1110001 00000 rs1 001 rd 1010011 FCLASS.D", da: disasm::f_to_x, emu: fclass_d },
        InsnDefn { template: "1100001 00000 rs1 rm rd 1010011 FCVT.W.D", da: disasm::f_to_x, emu: fcvt_w_d },
        InsnDefn { template: "1100001 00001 rs1 rm rd 1010011 FCVT.WU.D", da: disasm::f_to_x, emu: fcvt_wu_d },
        InsnDefn { template: "1101001 00000 rs1 rm rd 1010011 FCVT.D.W", da: disasm::x_to_f, emu: fcvt_d_w },
        InsnDefn { template: "1101001 00001 rs1 rm rd 1010011 FCVT.D.WU", da: disasm::x_to_f, emu: fcvt_d_wu },
    ],
};
