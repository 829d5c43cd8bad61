//! Word-width multiply and divide for RV64.

use crate::cpu::{Cpu, StepError};

use super::{disasm, rd, rs1, rs2, InsnDefn, IsaModule, WordLen};

fn mulw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = (cpu.rd_x(rs1(ins)) as i32).wrapping_mul(cpu.rd_x(rs2(ins)) as i32);
    cpu.wr_x(rd(ins), val as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn divw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as i32;
    let b = cpu.rd_x(rs2(ins)) as i32;
    let q = if b == 0 { -1 } else { a.wrapping_div(b) };
    cpu.wr_x(rd(ins), q as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn divuw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as u32;
    let b = cpu.rd_x(rs2(ins)) as u32;
    let q = if b == 0 { u32::MAX } else { a / b };
    cpu.wr_x(rd(ins), q as i32 as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn remw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as i32;
    let b = cpu.rd_x(rs2(ins)) as i32;
    let r = if b == 0 { a } else { a.wrapping_rem(b) };
    cpu.wr_x(rd(ins), r as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn remuw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as u32;
    let b = cpu.rd_x(rs2(ins)) as u32;
    let r = if b == 0 { a } else { a % b };
    cpu.wr_x(rd(ins), r as i32 as i64 as u64);
    cpu.advance(4);
    Ok(())
}

/// Word-width M operations, results sign-extended.
pub static RV64M: IsaModule = IsaModule {
    name: "rv64m",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "0000001 rs2 rs1 000 rd 0111011 MULW", da: disasm::r_type, emu: mulw },
        InsnDefn { template: "0000001 rs2 rs1 100 rd 0111011 DIVW", da: disasm::r_type, emu: divw },
        InsnDefn { template: "0000001 rs2 rs1 101 rd 0111011 DIVUW", da: disasm::r_type, emu: divuw },
        InsnDefn { template: "0000001 rs2 rs1 110 rd 0111011 REMW", da: disasm::r_type, emu: remw },
        InsnDefn { template: "0000001 rs2 rs1 111 rd 0111011 REMUW", da: disasm::r_type, emu: remuw },
    ],
};
