//! Per-shape disassembly handlers.
//!
//! Each handler renders one encoding shape with ABI register names and
//! the common pseudo-instruction spellings (`nop`, `mv`, `j`, `ret`,
//! `beqz`). Branch and jump targets are rendered as absolute addresses.

use crate::common::bits;
use crate::csr::addr as csr_addr;

use super::{csr_reg, imm_b, imm_i, imm_j, imm_s, rd, rs1, rs2, rs3, rvc, shamt, zimm};

/// ABI names of the integer registers.
pub const XREG: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// ABI names of the floating point registers.
pub const FREG: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

fn csr_name(reg: u32) -> String {
    let name = match reg {
        csr_addr::FFLAGS => "fflags",
        csr_addr::FRM => "frm",
        csr_addr::FCSR => "fcsr",
        csr_addr::SSTATUS => "sstatus",
        csr_addr::SIE => "sie",
        csr_addr::STVEC => "stvec",
        csr_addr::SSCRATCH => "sscratch",
        csr_addr::SEPC => "sepc",
        csr_addr::SCAUSE => "scause",
        csr_addr::STVAL => "stval",
        csr_addr::SIP => "sip",
        csr_addr::SATP => "satp",
        csr_addr::MSTATUS => "mstatus",
        csr_addr::MISA => "misa",
        csr_addr::MEDELEG => "medeleg",
        csr_addr::MIDELEG => "mideleg",
        csr_addr::MIE => "mie",
        csr_addr::MTVEC => "mtvec",
        csr_addr::MSCRATCH => "mscratch",
        csr_addr::MEPC => "mepc",
        csr_addr::MCAUSE => "mcause",
        csr_addr::MTVAL => "mtval",
        csr_addr::MIP => "mip",
        csr_addr::CYCLE => "cycle",
        csr_addr::TIME => "time",
        csr_addr::INSTRET => "instret",
        csr_addr::MHARTID => "mhartid",
        _ => return format!("{reg:#05x}"),
    };
    name.to_owned()
}

/// Mnemonic only.
pub fn none(name: &str, _pc: u64, _ins: u32) -> String {
    name.to_owned()
}

/// U-type: `lui rd,imm`.
pub fn u_type(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{:#x}", XREG[rd(ins)], bits::unsigned(ins, 31, 12))
}

/// J-type: `jal rd,target`, or `j target` when rd is zero.
pub fn j_type(name: &str, pc: u64, ins: u32) -> String {
    let target = pc.wrapping_add_signed(imm_j(ins));
    if rd(ins) == 0 {
        format!("j {target:#x}")
    } else {
        format!("{name} {},{target:#x}", XREG[rd(ins)])
    }
}

/// JALR with its `ret`/`jr` pseudo spellings.
pub fn jalr(name: &str, _pc: u64, ins: u32) -> String {
    let (rd, rs1, imm) = (rd(ins), rs1(ins), imm_i(ins));
    match (rd, rs1, imm) {
        (0, 1, 0) => "ret".to_owned(),
        (0, _, 0) => format!("jr {}", XREG[rs1]),
        _ => format!("{name} {},{imm}({})", XREG[rd], XREG[rs1]),
    }
}

/// I-type ALU: `addi rd,rs1,imm`, with `nop`/`mv` spellings.
pub fn i_type(name: &str, _pc: u64, ins: u32) -> String {
    let (rd, rs1, imm) = (rd(ins), rs1(ins), imm_i(ins));
    if name == "addi" {
        if rd == 0 && rs1 == 0 && imm == 0 {
            return "nop".to_owned();
        }
        if imm == 0 {
            return format!("mv {},{}", XREG[rd], XREG[rs1]);
        }
    }
    format!("{name} {},{},{imm}", XREG[rd], XREG[rs1])
}

/// Integer load: `lw rd,imm(rs1)`.
pub fn load(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}({})", XREG[rd(ins)], imm_i(ins), XREG[rs1(ins)])
}

/// Immediate shift: `slli rd,rs1,shamt`.
pub fn shift(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{},{}", XREG[rd(ins)], XREG[rs1(ins)], shamt(ins))
}

/// B-type: `beq rs1,rs2,target`, with `beqz`-style spellings.
pub fn b_type(name: &str, pc: u64, ins: u32) -> String {
    let target = pc.wrapping_add_signed(imm_b(ins));
    if rs2(ins) == 0 && (name == "beq" || name == "bne") {
        return format!("{name}z {},{target:#x}", XREG[rs1(ins)]);
    }
    format!("{name} {},{},{target:#x}", XREG[rs1(ins)], XREG[rs2(ins)])
}

/// S-type: `sw rs2,imm(rs1)`.
pub fn s_type(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}({})", XREG[rs2(ins)], imm_s(ins), XREG[rs1(ins)])
}

/// R-type: `add rd,rs1,rs2`.
pub fn r_type(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{},{}",
        XREG[rd(ins)],
        XREG[rs1(ins)],
        XREG[rs2(ins)]
    )
}

/// CSR with a register source: `csrrw rd,csr,rs1`.
pub fn csr(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{},{}",
        XREG[rd(ins)],
        csr_name(csr_reg(ins)),
        XREG[rs1(ins)]
    )
}

/// CSR with an immediate source: `csrrwi rd,csr,zimm`.
pub fn csr_imm(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{},{}",
        XREG[rd(ins)],
        csr_name(csr_reg(ins)),
        zimm(ins)
    )
}

/// Atomic: `amoadd.w rd,rs2,(rs1)`, `lr.w rd,(rs1)`.
pub fn amo(name: &str, _pc: u64, ins: u32) -> String {
    if name.starts_with("lr.") {
        return format!("{name} {},({})", XREG[rd(ins)], XREG[rs1(ins)]);
    }
    format!(
        "{name} {},{},({})",
        XREG[rd(ins)],
        XREG[rs2(ins)],
        XREG[rs1(ins)]
    )
}

/// FP load: `flw fd,imm(rs1)`.
pub fn f_load(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}({})", FREG[rd(ins)], imm_i(ins), XREG[rs1(ins)])
}

/// FP store: `fsw fs2,imm(rs1)`.
pub fn f_store(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}({})", FREG[rs2(ins)], imm_s(ins), XREG[rs1(ins)])
}

/// FP three-operand: `fadd.s fd,fs1,fs2`.
pub fn f_r_type(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{},{}",
        FREG[rd(ins)],
        FREG[rs1(ins)],
        FREG[rs2(ins)]
    )
}

/// FP fused multiply-add: `fmadd.s fd,fs1,fs2,fs3`.
pub fn f_r4_type(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{},{},{}",
        FREG[rd(ins)],
        FREG[rs1(ins)],
        FREG[rs2(ins)],
        FREG[rs3(ins)]
    )
}

/// FP two-operand: `fsqrt.s fd,fs1`.
pub fn f_unary(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", FREG[rd(ins)], FREG[rs1(ins)])
}

/// FP compare: `feq.s rd,fs1,fs2` (integer destination).
pub fn f_cmp(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{},{}",
        XREG[rd(ins)],
        FREG[rs1(ins)],
        FREG[rs2(ins)]
    )
}

/// FP to integer: `fcvt.w.s rd,fs1` (also FMV.X.*, FCLASS).
pub fn f_to_x(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rd(ins)], FREG[rs1(ins)])
}

/// Integer to FP: `fcvt.s.w fd,rs1` (also FMV.*.X).
pub fn x_to_f(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", FREG[rd(ins)], XREG[rs1(ins)])
}

// Compressed shapes.

/// CI-type ALU: `c.addi rd,imm` (also c.li, c.addiw).
pub fn ci(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rd_full(ins)], rvc::imm_ci(ins))
}

/// C.LUI: the immediate is rendered pre-shift, like LUI.
pub fn ci_lui(name: &str, _pc: u64, ins: u32) -> String {
    let imm = (rvc::imm_ci(ins) as u64) & 0xF_FFFF;
    format!("{name} {},{imm:#x}", XREG[rvc::rd_full(ins)])
}

/// C.ADDI16SP: `c.addi16sp sp,imm`.
pub fn ci_addi16sp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} sp,{}", rvc::imm_addi16sp(ins))
}

/// Compressed immediate shift on a prime register: `c.srli rd,shamt`.
pub fn c_shift_prime(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rs1_prime(ins)], rvc::shamt_c(ins))
}

/// Compressed immediate shift on a full register: `c.slli rd,shamt`.
pub fn c_shift_full(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rd_full(ins)], rvc::shamt_c(ins))
}

/// C.ANDI: `c.andi rd,imm`.
pub fn c_andi(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rs1_prime(ins)], rvc::imm_ci(ins))
}

/// CR-type arithmetic on prime registers: `c.sub rd,rs2`.
pub fn cr_prime(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{}",
        XREG[rvc::rs1_prime(ins)],
        XREG[rvc::rs2_prime(ins)]
    )
}

/// CR-type on full registers: `c.mv rd,rs2`, `c.add rd,rs2`.
pub fn cr_full(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{}",
        XREG[rvc::rd_full(ins)],
        XREG[rvc::rs2_full(ins)]
    )
}

/// CJ-type: `c.j target`, `c.jal target`.
pub fn cj(name: &str, pc: u64, ins: u32) -> String {
    format!("{name} {:#x}", pc.wrapping_add_signed(rvc::imm_cj(ins)))
}

/// Register jump: `c.jr rs1`, `c.jalr rs1`.
pub fn cjr(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {}", XREG[rvc::rd_full(ins)])
}

/// CB-type: `c.beqz rs1,target`.
pub fn cb(name: &str, pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{:#x}",
        XREG[rvc::rs1_prime(ins)],
        pc.wrapping_add_signed(rvc::imm_cb(ins))
    )
}

/// Word load/store on prime registers: `c.lw rd,ofs(rs1)`.
pub fn cl_w(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{}({})",
        XREG[rvc::rs2_prime(ins)],
        rvc::uimm_clw(ins),
        XREG[rvc::rs1_prime(ins)]
    )
}

/// Doubleword load/store on prime registers: `c.ld rd,ofs(rs1)`.
pub fn cl_d(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{}({})",
        XREG[rvc::rs2_prime(ins)],
        rvc::uimm_cld(ins),
        XREG[rvc::rs1_prime(ins)]
    )
}

/// FP doubleword load/store on prime registers: `c.fld fd,ofs(rs1)`.
pub fn cl_fd(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{}({})",
        FREG[rvc::rs2_prime(ins)],
        rvc::uimm_cld(ins),
        XREG[rvc::rs1_prime(ins)]
    )
}

/// FP word load/store on prime registers: `c.flw fd,ofs(rs1)`.
pub fn cl_fw(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},{}({})",
        FREG[rvc::rs2_prime(ins)],
        rvc::uimm_clw(ins),
        XREG[rvc::rs1_prime(ins)]
    )
}

/// C.ADDI4SPN: `c.addi4spn rd,sp,imm`.
pub fn ciw(name: &str, _pc: u64, ins: u32) -> String {
    format!(
        "{name} {},sp,{}",
        XREG[rvc::rs2_prime(ins)],
        rvc::uimm_addi4spn(ins)
    )
}

/// Stack-relative word load: `c.lwsp rd,ofs`.
pub fn c_lwsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rd_full(ins)], rvc::uimm_lwsp(ins))
}

/// Stack-relative doubleword load: `c.ldsp rd,ofs` (c.fldsp with an FP
/// destination is rendered by [`c_fldsp`]).
pub fn c_ldsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rd_full(ins)], rvc::uimm_ldsp(ins))
}

/// Stack-relative FP doubleword load: `c.fldsp fd,ofs`.
pub fn c_fldsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", FREG[rvc::rd_full(ins)], rvc::uimm_ldsp(ins))
}

/// Stack-relative FP word load: `c.flwsp fd,ofs`.
pub fn c_flwsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", FREG[rvc::rd_full(ins)], rvc::uimm_lwsp(ins))
}

/// Stack-relative word store: `c.swsp rs2,ofs`.
pub fn c_swsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rs2_full(ins)], rvc::uimm_swsp(ins))
}

/// Stack-relative doubleword store: `c.sdsp rs2,ofs`.
pub fn c_sdsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", XREG[rvc::rs2_full(ins)], rvc::uimm_sdsp(ins))
}

/// Stack-relative FP doubleword store: `c.fsdsp fs2,ofs`.
pub fn c_fsdsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", FREG[rvc::rs2_full(ins)], rvc::uimm_sdsp(ins))
}

/// Stack-relative FP word store: `c.fswsp fs2,ofs`.
pub fn c_fswsp(name: &str, _pc: u64, ins: u32) -> String {
    format!("{name} {},{}", FREG[rvc::rs2_full(ins)], rvc::uimm_swsp(ins))
}
