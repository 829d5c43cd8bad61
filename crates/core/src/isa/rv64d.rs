//! RV64 additions to the D extension: 64-bit integer conversions and
//! the direct FP/integer register moves.

use crate::cpu::{Cpu, StepError};

use super::fp;
use super::{disasm, rd, rs1, InsnDefn, IsaModule, WordLen};

fn fcvt_l_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = cpu.rd_f64(rs1(ins));
    let out = fp::cvt_i64(cpu, val, rm);
    cpu.wr_x(rd(ins), out as u64);
    cpu.advance(4);
    Ok(())
}

fn fcvt_lu_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = cpu.rd_f64(rs1(ins));
    let out = fp::cvt_u64(cpu, val, rm);
    cpu.wr_x(rd(ins), out);
    cpu.advance(4);
    Ok(())
}

fn fmv_x_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_f_raw(rs1(ins)));
    cpu.advance(4);
    Ok(())
}

fn fcvt_d_l(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)) as i64;
    cpu.wr_f64(rd(ins), val as f64);
    cpu.advance(4);
    Ok(())
}

fn fcvt_d_lu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins));
    cpu.wr_f64(rd(ins), val as f64);
    cpu.advance(4);
    Ok(())
}

fn fmv_d_x(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_f_raw(rd(ins), cpu.rd_x(rs1(ins)));
    cpu.advance(4);
    Ok(())
}

/// Long conversions and moves for double precision.
pub static RV64D: IsaModule = IsaModule {
    name: "rv64d",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "1100001 00010 rs1 rm rd 1010011 FCVT.L.D", da: disasm::f_to_x, emu: fcvt_l_d },
        InsnDefn { template: "1100001 00011 rs1 rm rd 1010011 FCVT.LU.D", da: disasm::f_to_x, emu: fcvt_lu_d },
        InsnDefn { template: "1110001 00000 rs1 000 rd 1010011 FMV.X.D", da: disasm::f_to_x, emu: fmv_x_d },
        InsnDefn { template: "1101001 00010 rs1 rm rd 1010011 FCVT.D.L", da: disasm::x_to_f, emu: fcvt_d_l },
        InsnDefn { template: "1101001 00011 rs1 rm rd 1010011 FCVT.D.LU", da: disasm::x_to_f, emu: fcvt_d_lu },
        InsnDefn { template: "1111001 00000 rs1 000 rd 1010011 FMV.D.X", da: disasm::x_to_f, emu: fmv_d_x },
    ],
};
