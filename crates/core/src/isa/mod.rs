//! Instruction set definition and decode.
//!
//! The instruction set is data, not code: each extension module is a
//! static table of instruction definitions, where a definition pairs the
//! bit-pattern template from the standard with a disassembly handler and
//! an emulation handler. An [`Isa`](matcher::Isa) compiles the templates
//! of the chosen modules into match descriptors at construction time;
//! decode at run time is a linear first-match scan.
//!
//! Extension modules:
//! - `rv32i`, `rv32m`, `rv32a`, `rv32f`, `rv32d`: the RV32 base and
//!   standard extensions (also the RV64 base, widened by `rv64*`).
//! - `system`: privileged instructions (SRET, MRET, WFI, SFENCE.VMA).
//! - `rvc`: compressed encodings common to RV32 and RV64.
//! - `rv32c`/`rv64c`: the width-specific compressed encodings that share
//!   opcode space (C.JAL vs C.ADDIW and the F/D vs LD/SD slots).
//! - `rv64i`, `rv64m`, `rv64a`, `rv64f`, `rv64d`: the RV64 widenings.

use crate::common::{bits, Xlen};
use crate::cpu::{Cpu, StepError};

pub mod disasm;
pub mod fields;
pub(crate) mod fp;
pub mod matcher;
pub mod parse;

pub mod rv32a;
pub mod rv32c;
pub mod rv32d;
pub mod rv32f;
pub mod rv32i;
pub mod rv32m;
pub mod rv64a;
pub mod rv64c;
pub mod rv64d;
pub mod rv64f;
pub mod rv64i;
pub mod rv64m;
pub mod rvc;
pub mod system;

pub use matcher::{Descriptor, Isa};
pub use parse::BuildError;

/// Encoding length of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordLen {
    /// A 16-bit compressed encoding.
    W16,
    /// A 32-bit encoding.
    W32,
}

impl WordLen {
    /// The length in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::W16 => 16,
            Self::W32 => 32,
        }
    }
}

/// A disassembly handler: renders `word` at `pc` using `mnemonic`.
pub type DaFn = fn(mnemonic: &str, pc: u64, word: u32) -> String;

/// An emulation handler. Owns the PC update for its instruction.
pub type EmuFn = fn(cpu: &mut Cpu, word: u32) -> Result<(), StepError>;

/// One instruction definition: the template line from the standard plus
/// its handlers.
pub struct InsnDefn {
    /// Bit-pattern template ending in the mnemonic.
    pub template: &'static str,
    /// Disassembly handler.
    pub da: DaFn,
    /// Emulation handler.
    pub emu: EmuFn,
}

/// A named group of instruction definitions sharing an encoding length.
pub struct IsaModule {
    /// Module name (e.g. `"rv32i"`).
    pub name: &'static str,
    /// Encoding length of every definition in the module.
    pub word_len: WordLen,
    /// The definitions, in match-priority order.
    pub defns: &'static [InsnDefn],
}

// Operand extraction for the 32-bit formats. Handlers and disassemblers
// share these.

pub(crate) fn rd(ins: u32) -> usize {
    bits::unsigned(ins, 11, 7) as usize
}

pub(crate) fn rs1(ins: u32) -> usize {
    bits::unsigned(ins, 19, 15) as usize
}

pub(crate) fn rs2(ins: u32) -> usize {
    bits::unsigned(ins, 24, 20) as usize
}

pub(crate) fn rs3(ins: u32) -> usize {
    bits::unsigned(ins, 31, 27) as usize
}

/// I-type immediate.
pub(crate) fn imm_i(ins: u32) -> i64 {
    bits::signed(ins, 31, 20)
}

/// S-type immediate.
pub(crate) fn imm_s(ins: u32) -> i64 {
    (bits::signed(ins, 31, 25) << 5) | i64::from(bits::unsigned(ins, 11, 7))
}

/// B-type immediate (byte offset, bit 0 implicit zero).
pub(crate) fn imm_b(ins: u32) -> i64 {
    let imm = bits::unsigned(ins, 31, 31) << 12
        | bits::unsigned(ins, 7, 7) << 11
        | bits::unsigned(ins, 30, 25) << 5
        | bits::unsigned(ins, 11, 8) << 1;
    bits::sign_extend(u64::from(imm), 12)
}

/// U-type immediate, already shifted into bits 31:12.
pub(crate) fn imm_u(ins: u32) -> i64 {
    bits::signed(ins, 31, 12) << 12
}

/// J-type immediate (byte offset, bit 0 implicit zero).
pub(crate) fn imm_j(ins: u32) -> i64 {
    let imm = bits::unsigned(ins, 31, 31) << 20
        | bits::unsigned(ins, 19, 12) << 12
        | bits::unsigned(ins, 20, 20) << 11
        | bits::unsigned(ins, 30, 21) << 1;
    bits::sign_extend(u64::from(imm), 20)
}

/// CSR register number.
pub(crate) fn csr_reg(ins: u32) -> u32 {
    bits::unsigned(ins, 31, 20)
}

/// Zero-extended 5-bit CSR immediate (the rs1 field).
pub(crate) fn zimm(ins: u32) -> u64 {
    u64::from(bits::unsigned(ins, 19, 15))
}

/// Raw 6-bit shift amount field; callers mask to the register width.
pub(crate) fn shamt(ins: u32) -> u32 {
    bits::unsigned(ins, 25, 20)
}

/// Rounding mode field.
pub(crate) fn rm(ins: u32) -> u32 {
    bits::unsigned(ins, 14, 12)
}

/// The RV32G module set (IMAFD plus the privileged instructions).
pub fn rv32g() -> Vec<&'static IsaModule> {
    vec![
        &rv32i::RV32I,
        &system::SYSTEM,
        &rv32m::RV32M,
        &rv32a::RV32A,
        &rv32f::RV32F,
        &rv32d::RV32D,
    ]
}

/// The RV32GC module set.
pub fn rv32gc() -> Vec<&'static IsaModule> {
    let mut m = rv32g();
    m.push(&rvc::RVC);
    m.push(&rv32c::RV32C);
    m
}

/// The RV64G module set.
pub fn rv64g() -> Vec<&'static IsaModule> {
    let mut m = rv32g();
    m.extend([
        &rv64i::RV64I,
        &rv64m::RV64M,
        &rv64a::RV64A,
        &rv64f::RV64F,
        &rv64d::RV64D,
    ]);
    m
}

/// The RV64GC module set.
pub fn rv64gc() -> Vec<&'static IsaModule> {
    let mut m = rv64g();
    m.push(&rvc::RVC);
    m.push(&rv64c::RV64C);
    m
}

/// Assembles a module set from an extension string such as `"imafdc"`.
/// `g` expands to `imafd`. The base integer set is always included.
pub fn modules(xlen: Xlen, extensions: &str) -> Result<Vec<&'static IsaModule>, BuildError> {
    let mut ext = String::new();
    for c in extensions.chars() {
        match c {
            'g' => ext.push_str("imafd"),
            c => ext.push(c),
        }
    }

    let mut set: Vec<&'static IsaModule> = vec![&rv32i::RV32I, &system::SYSTEM];
    let rv64 = xlen == Xlen::Rv64;
    if rv64 {
        set.push(&rv64i::RV64I);
    }
    for c in ext.chars() {
        match c {
            'i' => {}
            'm' => {
                set.push(&rv32m::RV32M);
                if rv64 {
                    set.push(&rv64m::RV64M);
                }
            }
            'a' => {
                set.push(&rv32a::RV32A);
                if rv64 {
                    set.push(&rv64a::RV64A);
                }
            }
            'f' => {
                set.push(&rv32f::RV32F);
                if rv64 {
                    set.push(&rv64f::RV64F);
                }
            }
            'd' => {
                set.push(&rv32d::RV32D);
                if rv64 {
                    set.push(&rv64d::RV64D);
                }
            }
            'c' => {
                set.push(&rvc::RVC);
                set.push(if rv64 { &rv64c::RV64C } else { &rv32c::RV32C });
            }
            c => return Err(BuildError::UnknownExtension(c)),
        }
    }
    Ok(set)
}
