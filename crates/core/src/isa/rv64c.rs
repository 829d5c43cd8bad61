//! RV64-only compressed encodings.

use crate::common::bits;
use crate::cpu::{Cpu, StepError};

use super::{disasm, rvc, InsnDefn, IsaModule, WordLen};

fn addiw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rvc::rd_full(ins);
    let val = cpu.rd_x(rd).wrapping_add_signed(rvc::imm_ci(ins));
    cpu.wr_x(rd, bits::sign_extend(val & 0xFFFF_FFFF, 31) as u64);
    cpu.advance(2);
    Ok(())
}

fn ld(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rvc::rs1_prime(ins)).wrapping_add(rvc::uimm_cld(ins));
    let val = cpu.load_u64(addr)?;
    cpu.wr_x(rvc::rs2_prime(ins), val);
    cpu.advance(2);
    Ok(())
}

fn sd(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rvc::rs1_prime(ins)).wrapping_add(rvc::uimm_cld(ins));
    cpu.store_u64(addr, cpu.rd_x(rvc::rs2_prime(ins)))?;
    cpu.advance(2);
    Ok(())
}

fn subw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rvc::rs1_prime(ins);
    let val = cpu.rd_x(rd).wrapping_sub(cpu.rd_x(rvc::rs2_prime(ins)));
    cpu.wr_x(rd, bits::sign_extend(val & 0xFFFF_FFFF, 31) as u64);
    cpu.advance(2);
    Ok(())
}

fn addw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rvc::rs1_prime(ins);
    let val = cpu.rd_x(rd).wrapping_add(cpu.rd_x(rvc::rs2_prime(ins)));
    cpu.wr_x(rd, bits::sign_extend(val & 0xFFFF_FFFF, 31) as u64);
    cpu.advance(2);
    Ok(())
}

fn ldsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(rvc::uimm_ldsp(ins));
    let val = cpu.load_u64(addr)?;
    cpu.wr_x(rvc::rd_full(ins), val);
    cpu.advance(2);
    Ok(())
}

fn sdsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(rvc::uimm_sdsp(ins));
    cpu.store_u64(addr, cpu.rd_x(rvc::rs2_full(ins)))?;
    cpu.advance(2);
    Ok(())
}

/// Compressed encodings valid only at XLEN=64.
pub static RV64C: IsaModule = IsaModule {
    name: "rv64c",
    word_len: WordLen::W16,
    defns: &[
        InsnDefn { template: "001 imm[5] rs1/rd!=0 imm[4:0] 01 C.ADDIW", da: disasm::ci, emu: addiw },
        InsnDefn { template: "011 uimm[5:3] rs10 uimm[7:6] rd0 00 C.LD", da: disasm::cl_d, emu: ld },
        InsnDefn { template: "111 uimm[5:3] rs10 uimm[7:6] rs20 00 C.SD", da: disasm::cl_d, emu: sd },
        InsnDefn { template: "100 1 11 rs10/rd0 00 rs20 01 C.SUBW", da: disasm::cr_prime, emu: subw },
        InsnDefn { template: "100 1 11 rs10/rd0 01 rs20 01 C.ADDW", da: disasm::cr_prime, emu: addw },
        InsnDefn { template: "011 uimm[5] rd!=0 uimm[4:3|8:6] 10 C.LDSP", da: disasm::c_ldsp, emu: ldsp },
        InsnDefn { template: "111 uimm[5:3|8:6] rs2 10 C.SDSP", da: disasm::c_sdsp, emu: sdsp },
    ],
};
