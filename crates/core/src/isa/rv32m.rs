//! The M standard extension: integer multiply and divide.
//!
//! Division by zero and signed overflow never trap; the standard fixes
//! the results (all-ones or the dividend for division by zero, the
//! dividend for the overflowing remainder).

use crate::common::Xlen;
use crate::cpu::{Cpu, StepError};

use super::{disasm, rd, rs1, rs2, InsnDefn, IsaModule, WordLen};

fn unsigned_operand(cpu: &Cpu, r: usize) -> u64 {
    cpu.rd_x(r) & cpu.xlen().addr_mask()
}

fn mul(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)).wrapping_mul(cpu.rd_x(rs2(ins))));
    cpu.advance(4);
    Ok(())
}

fn mulh(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as i64;
    let b = cpu.rd_x(rs2(ins)) as i64;
    let hi = match cpu.xlen() {
        Xlen::Rv32 => (a.wrapping_mul(b) >> 32) as u64,
        Xlen::Rv64 => ((i128::from(a) * i128::from(b)) >> 64) as u64,
    };
    cpu.wr_x(rd(ins), hi);
    cpu.advance(4);
    Ok(())
}

fn mulhsu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as i64;
    let b = unsigned_operand(cpu, rs2(ins));
    let hi = match cpu.xlen() {
        Xlen::Rv32 => (a.wrapping_mul(b as i64) >> 32) as u64,
        Xlen::Rv64 => ((i128::from(a) * i128::from(b)) >> 64) as u64,
    };
    cpu.wr_x(rd(ins), hi);
    cpu.advance(4);
    Ok(())
}

fn mulhu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = unsigned_operand(cpu, rs1(ins));
    let b = unsigned_operand(cpu, rs2(ins));
    let hi = match cpu.xlen() {
        Xlen::Rv32 => (a.wrapping_mul(b) >> 32) as u64,
        Xlen::Rv64 => ((u128::from(a) * u128::from(b)) >> 64) as u64,
    };
    cpu.wr_x(rd(ins), hi);
    cpu.advance(4);
    Ok(())
}

fn div(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as i64;
    let b = cpu.rd_x(rs2(ins)) as i64;
    let q = if b == 0 { -1 } else { a.wrapping_div(b) };
    cpu.wr_x(rd(ins), q as u64);
    cpu.advance(4);
    Ok(())
}

fn divu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = unsigned_operand(cpu, rs1(ins));
    let b = unsigned_operand(cpu, rs2(ins));
    let q = if b == 0 { u64::MAX } else { a / b };
    cpu.wr_x(rd(ins), q);
    cpu.advance(4);
    Ok(())
}

fn rem(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = cpu.rd_x(rs1(ins)) as i64;
    let b = cpu.rd_x(rs2(ins)) as i64;
    let r = if b == 0 { a } else { a.wrapping_rem(b) };
    cpu.wr_x(rd(ins), r as u64);
    cpu.advance(4);
    Ok(())
}

fn remu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let a = unsigned_operand(cpu, rs1(ins));
    let b = unsigned_operand(cpu, rs2(ins));
    let r = if b == 0 { a } else { a % b };
    cpu.wr_x(rd(ins), r);
    cpu.advance(4);
    Ok(())
}

/// Multiply and divide at the full register width.
pub static RV32M: IsaModule = IsaModule {
    name: "rv32m",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "0000001 rs2 rs1 000 rd 0110011 MUL", da: disasm::r_type, emu: mul },
        InsnDefn { template: "0000001 rs2 rs1 001 rd 0110011 MULH", da: disasm::r_type, emu: mulh },
        InsnDefn { template: "0000001 rs2 rs1 010 rd 0110011 MULHSU", da: disasm::r_type, emu: mulhsu },
        InsnDefn { template: "0000001 rs2 rs1 011 rd 0110011 MULHU", da: disasm::r_type, emu: mulhu },
        InsnDefn { template: "0000001 rs2 rs1 100 rd 0110011 DIV", da: disasm::r_type, emu: div },
        InsnDefn { template: "0000001 rs2 rs1 101 rd 0110011 DIVU", da: disasm::r_type, emu: divu },
        InsnDefn { template: "0000001 rs2 rs1 110 rd 0110011 REM", da: disasm::r_type, emu: rem },
        InsnDefn { template: "0000001 rs2 rs1 111 rd 0110011 REMU", da: disasm::r_type, emu: remu },
    ],
};
