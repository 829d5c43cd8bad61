//! The RV32I base integer instruction set, plus Zicsr and Zifencei.
//!
//! This module is also the RV64I base: every handler reads and writes the
//! full 64-bit register file, and the 32-bit storage convention (values
//! kept sign-extended to 64 bits) makes the signed and unsigned compares
//! correct at either width. The few operations that need explicit width
//! awareness (the right shifts) mask to the register width themselves.

use crate::common::bits;
use crate::cpu::{Cpu, StepError};

use super::{
    csr_reg, disasm, imm_b, imm_i, imm_j, imm_s, imm_u, rd, rs1, rs2, shamt, zimm, InsnDefn,
    IsaModule, WordLen,
};

fn lui(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), imm_u(ins) as u64);
    cpu.advance(4);
    Ok(())
}

fn auipc(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.pc().wrapping_add_signed(imm_u(ins)));
    cpu.advance(4);
    Ok(())
}

fn jal(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let link = cpu.pc().wrapping_add(4);
    cpu.set_pc(cpu.pc().wrapping_add_signed(imm_j(ins)));
    cpu.wr_x(rd(ins), link);
    Ok(())
}

fn jalr(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let link = cpu.pc().wrapping_add(4);
    let target = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins)) & !1;
    cpu.set_pc(target);
    cpu.wr_x(rd(ins), link);
    Ok(())
}

fn branch(cpu: &mut Cpu, ins: u32, taken: bool) {
    if taken {
        cpu.set_pc(cpu.pc().wrapping_add_signed(imm_b(ins)));
    } else {
        cpu.advance(4);
    }
}

fn beq(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    branch(cpu, ins, cpu.rd_x(rs1(ins)) == cpu.rd_x(rs2(ins)));
    Ok(())
}

fn bne(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    branch(cpu, ins, cpu.rd_x(rs1(ins)) != cpu.rd_x(rs2(ins)));
    Ok(())
}

fn blt(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    branch(cpu, ins, (cpu.rd_x(rs1(ins)) as i64) < cpu.rd_x(rs2(ins)) as i64);
    Ok(())
}

fn bge(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    branch(cpu, ins, cpu.rd_x(rs1(ins)) as i64 >= cpu.rd_x(rs2(ins)) as i64);
    Ok(())
}

fn bltu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    branch(cpu, ins, cpu.rd_x(rs1(ins)) < cpu.rd_x(rs2(ins)));
    Ok(())
}

fn bgeu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    branch(cpu, ins, cpu.rd_x(rs1(ins)) >= cpu.rd_x(rs2(ins)));
    Ok(())
}

fn ea(cpu: &Cpu, ins: u32) -> u64 {
    cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins))
}

fn lb(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.load_u8(ea(cpu, ins))?;
    cpu.wr_x(rd(ins), bits::sign_extend(u64::from(val), 7) as u64);
    cpu.advance(4);
    Ok(())
}

fn lh(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.load_u16(ea(cpu, ins))?;
    cpu.wr_x(rd(ins), bits::sign_extend(u64::from(val), 15) as u64);
    cpu.advance(4);
    Ok(())
}

fn lw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.load_u32(ea(cpu, ins))?;
    cpu.wr_x(rd(ins), bits::sign_extend(u64::from(val), 31) as u64);
    cpu.advance(4);
    Ok(())
}

fn lbu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.load_u8(ea(cpu, ins))?;
    cpu.wr_x(rd(ins), u64::from(val));
    cpu.advance(4);
    Ok(())
}

fn lhu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.load_u16(ea(cpu, ins))?;
    cpu.wr_x(rd(ins), u64::from(val));
    cpu.advance(4);
    Ok(())
}

fn store_ea(cpu: &Cpu, ins: u32) -> u64 {
    cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_s(ins))
}

fn sb(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.store_u8(store_ea(cpu, ins), cpu.rd_x(rs2(ins)) as u8)?;
    cpu.advance(4);
    Ok(())
}

fn sh(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.store_u16(store_ea(cpu, ins), cpu.rd_x(rs2(ins)) as u16)?;
    cpu.advance(4);
    Ok(())
}

fn sw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.store_u32(store_ea(cpu, ins), cpu.rd_x(rs2(ins)) as u32)?;
    cpu.advance(4);
    Ok(())
}

fn addi(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins)));
    cpu.advance(4);
    Ok(())
}

fn slti(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), u64::from((cpu.rd_x(rs1(ins)) as i64) < imm_i(ins)));
    cpu.advance(4);
    Ok(())
}

fn sltiu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), u64::from(cpu.rd_x(rs1(ins)) < imm_i(ins) as u64));
    cpu.advance(4);
    Ok(())
}

fn xori(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) ^ imm_i(ins) as u64);
    cpu.advance(4);
    Ok(())
}

fn ori(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) | imm_i(ins) as u64);
    cpu.advance(4);
    Ok(())
}

fn andi(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) & imm_i(ins) as u64);
    cpu.advance(4);
    Ok(())
}

fn slli(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = shamt(ins) & (cpu.xlen().bits() - 1);
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) << sh);
    cpu.advance(4);
    Ok(())
}

fn srli(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = shamt(ins) & (cpu.xlen().bits() - 1);
    let val = cpu.rd_x(rs1(ins)) & cpu.xlen().addr_mask();
    cpu.wr_x(rd(ins), val >> sh);
    cpu.advance(4);
    Ok(())
}

fn srai(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = shamt(ins) & (cpu.xlen().bits() - 1);
    cpu.wr_x(rd(ins), ((cpu.rd_x(rs1(ins)) as i64) >> sh) as u64);
    cpu.advance(4);
    Ok(())
}

fn add(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)).wrapping_add(cpu.rd_x(rs2(ins))));
    cpu.advance(4);
    Ok(())
}

fn sub(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)).wrapping_sub(cpu.rd_x(rs2(ins))));
    cpu.advance(4);
    Ok(())
}

fn sll(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = cpu.rd_x(rs2(ins)) as u32 & (cpu.xlen().bits() - 1);
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) << sh);
    cpu.advance(4);
    Ok(())
}

fn slt(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let lt = (cpu.rd_x(rs1(ins)) as i64) < cpu.rd_x(rs2(ins)) as i64;
    cpu.wr_x(rd(ins), u64::from(lt));
    cpu.advance(4);
    Ok(())
}

fn sltu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), u64::from(cpu.rd_x(rs1(ins)) < cpu.rd_x(rs2(ins))));
    cpu.advance(4);
    Ok(())
}

fn xor(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) ^ cpu.rd_x(rs2(ins)));
    cpu.advance(4);
    Ok(())
}

fn srl(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = cpu.rd_x(rs2(ins)) as u32 & (cpu.xlen().bits() - 1);
    let val = cpu.rd_x(rs1(ins)) & cpu.xlen().addr_mask();
    cpu.wr_x(rd(ins), val >> sh);
    cpu.advance(4);
    Ok(())
}

fn sra(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = cpu.rd_x(rs2(ins)) as u32 & (cpu.xlen().bits() - 1);
    cpu.wr_x(rd(ins), ((cpu.rd_x(rs1(ins)) as i64) >> sh) as u64);
    cpu.advance(4);
    Ok(())
}

fn or(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) | cpu.rd_x(rs2(ins)));
    cpu.advance(4);
    Ok(())
}

fn and(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) & cpu.rd_x(rs2(ins)));
    cpu.advance(4);
    Ok(())
}

// A single hart with no caches: both fences are complete by construction.

fn fence(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    cpu.advance(4);
    Ok(())
}

fn fence_i(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    cpu.advance(4);
    Ok(())
}

fn ecall(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    Err(StepError::Ecall { pc: cpu.pc() })
}

fn ebreak(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    Err(StepError::Ebreak { pc: cpu.pc() })
}

fn csr_err(pc: u64, source: crate::csr::CsrError) -> StepError {
    StepError::Csr { pc, source }
}

fn csrrw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let pc = cpu.pc();
    let reg = csr_reg(ins);
    let src = cpu.rd_x(rs1(ins));
    // rd=x0 skips the read and its side effects
    if rd(ins) != 0 {
        let old = cpu.csr.read(reg).map_err(|e| csr_err(pc, e))?;
        cpu.wr_x(rd(ins), old);
    }
    cpu.csr.write(reg, src).map_err(|e| csr_err(pc, e))?;
    cpu.advance(4);
    Ok(())
}

fn csrrs(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let pc = cpu.pc();
    let reg = csr_reg(ins);
    let old = cpu.csr.read(reg).map_err(|e| csr_err(pc, e))?;
    if rs1(ins) != 0 {
        let set = cpu.rd_x(rs1(ins));
        cpu.csr.write(reg, old | set).map_err(|e| csr_err(pc, e))?;
    }
    cpu.wr_x(rd(ins), old);
    cpu.advance(4);
    Ok(())
}

fn csrrc(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let pc = cpu.pc();
    let reg = csr_reg(ins);
    let old = cpu.csr.read(reg).map_err(|e| csr_err(pc, e))?;
    if rs1(ins) != 0 {
        let clear = cpu.rd_x(rs1(ins));
        cpu.csr.write(reg, old & !clear).map_err(|e| csr_err(pc, e))?;
    }
    cpu.wr_x(rd(ins), old);
    cpu.advance(4);
    Ok(())
}

fn csrrwi(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let pc = cpu.pc();
    let reg = csr_reg(ins);
    if rd(ins) != 0 {
        let old = cpu.csr.read(reg).map_err(|e| csr_err(pc, e))?;
        cpu.wr_x(rd(ins), old);
    }
    cpu.csr.write(reg, zimm(ins)).map_err(|e| csr_err(pc, e))?;
    cpu.advance(4);
    Ok(())
}

fn csrrsi(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let pc = cpu.pc();
    let reg = csr_reg(ins);
    let old = cpu.csr.read(reg).map_err(|e| csr_err(pc, e))?;
    if zimm(ins) != 0 {
        cpu.csr
            .write(reg, old | zimm(ins))
            .map_err(|e| csr_err(pc, e))?;
    }
    cpu.wr_x(rd(ins), old);
    cpu.advance(4);
    Ok(())
}

fn csrrci(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let pc = cpu.pc();
    let reg = csr_reg(ins);
    let old = cpu.csr.read(reg).map_err(|e| csr_err(pc, e))?;
    if zimm(ins) != 0 {
        cpu.csr
            .write(reg, old & !zimm(ins))
            .map_err(|e| csr_err(pc, e))?;
    }
    cpu.wr_x(rd(ins), old);
    cpu.advance(4);
    Ok(())
}

/// The base integer set. Shared between RV32 and RV64; `rv64i` adds the
/// wider shift encodings and the word-width operations.
pub static RV32I: IsaModule = IsaModule {
    name: "rv32i",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "imm[31:12] rd 0110111 LUI", da: disasm::u_type, emu: lui },
        InsnDefn { template: "imm[31:12] rd 0010111 AUIPC", da: disasm::u_type, emu: auipc },
        InsnDefn { template: "imm[20|10:1|11|19:12] rd 1101111 JAL", da: disasm::j_type, emu: jal },
        InsnDefn { template: "imm[11:0] rs1 000 rd 1100111 JALR", da: disasm::jalr, emu: jalr },
        InsnDefn { template: "imm[12|10:5] rs2 rs1 000 imm[4:1|11] 1100011 BEQ", da: disasm::b_type, emu: beq },
        InsnDefn { template: "imm[12|10:5] rs2 rs1 001 imm[4:1|11] 1100011 BNE", da: disasm::b_type, emu: bne },
        InsnDefn { template: "imm[12|10:5] rs2 rs1 100 imm[4:1|11] 1100011 BLT", da: disasm::b_type, emu: blt },
        InsnDefn { template: "imm[12|10:5] rs2 rs1 101 imm[4:1|11] 1100011 BGE", da: disasm::b_type, emu: bge },
        InsnDefn { template: "imm[12|10:5] rs2 rs1 110 imm[4:1|11] 1100011 BLTU", da: disasm::b_type, emu: bltu },
        InsnDefn { template: "imm[12|10:5] rs2 rs1 111 imm[4:1|11] 1100011 BGEU", da: disasm::b_type, emu: bgeu },
        InsnDefn { template: "imm[11:0] rs1 000 rd 0000011 LB", da: disasm::load, emu: lb },
        InsnDefn { template: "imm[11:0] rs1 001 rd 0000011 LH", da: disasm::load, emu: lh },
        InsnDefn { template: "imm[11:0] rs1 010 rd 0000011 LW", da: disasm::load, emu: lw },
        InsnDefn { template: "imm[11:0] rs1 100 rd 0000011 LBU", da: disasm::load, emu: lbu },
        InsnDefn { template: "imm[11:0] rs1 101 rd 0000011 LHU", da: disasm::load, emu: lhu },
        InsnDefn { template: "imm[11:5] rs2 rs1 000 imm[4:0] 0100011 SB", da: disasm::s_type, emu: sb },
        InsnDefn { template: "imm[11:5] rs2 rs1 001 imm[4:0] 0100011 SH", da: disasm::s_type, emu: sh },
        InsnDefn { template: "imm[11:5] rs2 rs1 010 imm[4:0] 0100011 SW", da: disasm::s_type, emu: sw },
        InsnDefn { template: "imm[11:0] rs1 000 rd 0010011 ADDI", da: disasm::i_type, emu: addi },
        InsnDefn { template: "imm[11:0] rs1 010 rd 0010011 SLTI", da: disasm::i_type, emu: slti },
        InsnDefn { template: "imm[11:0] rs1 011 rd 0010011 SLTIU", da: disasm::i_type, emu: sltiu },
        InsnDefn { template: "imm[11:0] rs1 100 rd 0010011 XORI", da: disasm::i_type, emu: xori },
        InsnDefn { template: "imm[11:0] rs1 110 rd 0010011 ORI", da: disasm::i_type, emu: ori },
        InsnDefn { template: "imm[11:0] rs1 111 rd 0010011 ANDI", da: disasm::i_type, emu: andi },
        InsnDefn { template: "0000000 shamt5 rs1 001 rd 0010011 SLLI", da: disasm::shift, emu: slli },
        InsnDefn { template: "0000000 shamt5 rs1 101 rd 0010011 SRLI", da: disasm::shift, emu: srli },
        InsnDefn { template: "0100000 shamt5 rs1 101 rd 0010011 SRAI", da: disasm::shift, emu: srai },
        InsnDefn { template: "0000000 rs2 rs1 000 rd 0110011 ADD", da: disasm::r_type, emu: add },
        InsnDefn { template: "0100000 rs2 rs1 000 rd 0110011 SUB", da: disasm::r_type, emu: sub },
        InsnDefn { template: "0000000 rs2 rs1 001 rd 0110011 SLL", da: disasm::r_type, emu: sll },
        InsnDefn { template: "0000000 rs2 rs1 010 rd 0110011 SLT", da: disasm::r_type, emu: slt },
        InsnDefn { template: "0000000 rs2 rs1 011 rd 0110011 SLTU", da: disasm::r_type, emu: sltu },
        InsnDefn { template: "0000000 rs2 rs1 100 rd 0110011 XOR", da: disasm::r_type, emu: xor },
        InsnDefn { template: "0000000 rs2 rs1 101 rd 0110011 SRL", da: disasm::r_type, emu: srl },
        InsnDefn { template: "0100000 rs2 rs1 101 rd 0110011 SRA", da: disasm::r_type, emu: sra },
        InsnDefn { template: "0000000 rs2 rs1 110 rd 0110011 OR", da: disasm::r_type, emu: or },
        InsnDefn { template: "0000000 rs2 rs1 111 rd 0110011 AND", da: disasm::r_type, emu: and },
        InsnDefn { template: "0000 pred succ 00000 000 00000 0001111 FENCE", da: disasm::none, emu: fence },
        InsnDefn { template: "000000000000 00000 001 00000 0001111 FENCE.I", da: disasm::none, emu: fence_i },
        InsnDefn { template: "000000000000 00000 000 00000 1110011 ECALL", da: disasm::none, emu: ecall },
        InsnDefn { template: "000000000001 00000 000 00000 1110011 EBREAK", da: disasm::none, emu: ebreak },
        InsnDefn { template: "csr rs1 001 rd 1110011 CSRRW", da: disasm::csr, emu: csrrw },
        InsnDefn { template: "csr rs1 010 rd 1110011 CSRRS", da: disasm::csr, emu: csrrs },
        InsnDefn { template: "csr rs1 011 rd 1110011 CSRRC", da: disasm::csr, emu: csrrc },
        InsnDefn { template: "csr zimm 101 rd 1110011 CSRRWI", da: disasm::csr_imm, emu: csrrwi },
        InsnDefn { template: "csr zimm 110 rd 1110011 CSRRSI", da: disasm::csr_imm, emu: csrrsi },
        InsnDefn { template: "csr zimm 111 rd 1110011 CSRRCI", da: disasm::csr_imm, emu: csrrci },
    ],
};
