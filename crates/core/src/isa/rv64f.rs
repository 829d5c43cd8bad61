//! RV64 additions to the F extension: 64-bit integer conversions.

use crate::cpu::{Cpu, StepError};

use super::fp;
use super::{disasm, rd, rs1, InsnDefn, IsaModule, WordLen};

fn fcvt_l_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = f64::from(cpu.rd_f32(rs1(ins)));
    let out = fp::cvt_i64(cpu, val, rm);
    cpu.wr_x(rd(ins), out as u64);
    cpu.advance(4);
    Ok(())
}

fn fcvt_lu_s(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rm = fp::effective_rm(cpu, ins);
    let val = f64::from(cpu.rd_f32(rs1(ins)));
    let out = fp::cvt_u64(cpu, val, rm);
    cpu.wr_x(rd(ins), out);
    cpu.advance(4);
    Ok(())
}

fn fcvt_s_l(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)) as i64;
    cpu.wr_f32(rd(ins), val as f32);
    cpu.advance(4);
    Ok(())
}

fn fcvt_s_lu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins));
    cpu.wr_f32(rd(ins), val as f32);
    cpu.advance(4);
    Ok(())
}

/// Long conversions for single precision.
pub static RV64F: IsaModule = IsaModule {
    name: "rv64f",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "1100000 00010 rs1 rm rd 1010011 FCVT.L.S", da: disasm::f_to_x, emu: fcvt_l_s },
        InsnDefn { template: "1100000 00011 rs1 rm rd 1010011 FCVT.LU.S", da: disasm::f_to_x, emu: fcvt_lu_s },
        InsnDefn { template: "1101000 00010 rs1 rm rd 1010011 FCVT.S.L", da: disasm::x_to_f, emu: fcvt_s_l },
        InsnDefn { template: "1101000 00011 rs1 rm rd 1010011 FCVT.S.LU", da: disasm::x_to_f, emu: fcvt_s_lu },
    ],
};
