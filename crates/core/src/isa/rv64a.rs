//! Doubleword atomics for RV64.

use crate::cpu::{Cpu, StepError};

use super::{disasm, rd, rs1, rs2, InsnDefn, IsaModule, WordLen};

fn lr_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins));
    let val = cpu.load_u64(addr)?;
    cpu.reserve(addr);
    cpu.wr_x(rd(ins), val);
    cpu.advance(4);
    Ok(())
}

fn sc_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins));
    if cpu.claim_reservation(addr) {
        cpu.store_u64(addr, cpu.rd_x(rs2(ins)))?;
        cpu.wr_x(rd(ins), 0);
    } else {
        cpu.wr_x(rd(ins), 1);
    }
    cpu.advance(4);
    Ok(())
}

fn amo_d(cpu: &mut Cpu, ins: u32, op: fn(u64, u64) -> u64) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins));
    let old = cpu.load_u64(addr)?;
    let new = op(old, cpu.rd_x(rs2(ins)));
    cpu.store_u64(addr, new)?;
    cpu.wr_x(rd(ins), old);
    cpu.advance(4);
    Ok(())
}

fn amoswap_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, |_, b| b)
}

fn amoadd_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, u64::wrapping_add)
}

fn amoxor_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, |a, b| a ^ b)
}

fn amoand_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, |a, b| a & b)
}

fn amoor_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, |a, b| a | b)
}

fn amomin_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, |a, b| (a as i64).min(b as i64) as u64)
}

fn amomax_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, |a, b| (a as i64).max(b as i64) as u64)
}

fn amominu_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, u64::min)
}

fn amomaxu_d(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_d(cpu, ins, u64::max)
}

/// Doubleword atomic memory operations.
pub static RV64A: IsaModule = IsaModule {
    name: "rv64a",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "00010 aq rl 00000 rs1 011 rd 0101111 LR.D", da: disasm::amo, emu: lr_d },
        InsnDefn { template: "00011 aq rl rs2 rs1 011 rd 0101111 SC.D", da: disasm::amo, emu: sc_d },
        InsnDefn { template: "00001 aq rl rs2 rs1 011 rd 0101111 AMOSWAP.D", da: disasm::amo, emu: amoswap_d },
        InsnDefn { template: "00000 aq rl rs2 rs1 011 rd 0101111 AMOADD.D", da: disasm::amo, emu: amoadd_d },
        InsnDefn { template: "00100 aq rl rs2 rs1 011 rd 0101111 AMOXOR.D", da: disasm::amo, emu: amoxor_d },
        InsnDefn { template: "01100 aq rl rs2 rs1 011 rd 0101111 AMOAND.D", da: disasm::amo, emu: amoand_d },
        InsnDefn { template: "01000 aq rl rs2 rs1 011 rd 0101111 AMOOR.D", da: disasm::amo, emu: amoor_d },
        InsnDefn { template: "10000 aq rl rs2 rs1 011 rd 0101111 AMOMIN.D", da: disasm::amo, emu: amomin_d },
        InsnDefn { template: "10100 aq rl rs2 rs1 011 rd 0101111 AMOMAX.D", da: disasm::amo, emu: amomax_d },
        InsnDefn { template: "11000 aq rl rs2 rs1 011 rd 0101111 AMOMINU.D", da: disasm::amo, emu: amominu_d },
        InsnDefn { template: "11100 aq rl rs2 rs1 011 rd 0101111 AMOMAXU.D", da: disasm::amo, emu: amomaxu_d },
    ],
};
