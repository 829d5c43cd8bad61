//! The field-width tables for instruction templates.
//!
//! A template names its operand fields with the exact spellings used by
//! the instruction listings in the RISC-V specification. These tables give
//! the bit width of every legal field name, separately for 32-bit and
//! 16-bit encodings. An unknown name is a configuration error caught at
//! template compile time.

use super::WordLen;

/// Width in bits of a named 32-bit-encoding field.
fn width32(name: &str) -> Option<u32> {
    let n = match name {
        "imm[31:12]" | "imm[20|10:1|11|19:12]" => 20,
        "imm[11:0]" | "csr" => 12,
        "imm[12|10:5]" | "imm[11:5]" => 7,
        "imm[4:1|11]" | "imm[4:0]" => 5,
        "rd" | "rs1" | "rs2" | "rs3" | "shamt5" | "zimm" => 5,
        "shamt6" => 6,
        "pred" | "succ" => 4,
        "rm" => 3,
        "aq" | "rl" => 1,
        _ => return None,
    };
    Some(n)
}

/// Width in bits of a named 16-bit-encoding field.
///
/// Fields with value constraints (`rd!=0`, `rs1/rd!=0`, `rd!={0,2}`)
/// occupy the full register field; the constraint is not encoded in the
/// match mask, so the constrained encodings must be listed before the
/// general ones they overlap.
fn width16(name: &str) -> Option<u32> {
    let n = match name {
        "rd0" | "rs10" | "rs20" | "rs10/rd0" => 3,
        "rd" | "rs2" | "rs1/rd!=0" | "rd!=0" | "rs1!=0" | "rs2!=0" | "rd!={0,2}" => 5,
        "nzuimm[5:4|9:6|2|3]" => 8,
        "uimm[5:3]" | "imm[8|4:3]" => 3,
        "uimm[7:6]" | "uimm[2|6]" => 2,
        "nzimm[5]" | "nzimm[9]" | "nzimm[17]" | "nzuimm[5]" | "uimm[5]" | "imm[5]" => 1,
        "nzimm[4:0]" | "imm[4:0]" | "nzuimm[4:0]" | "nzimm[16:12]" => 5,
        "nzimm[4|6|8:7|5]" | "imm[7:6|2:1|5]" | "uimm[4:2|7:6]" | "uimm[4:3|8:6]" => 5,
        "imm[11|4|9:8|10|6|7|3:1|5]" => 11,
        "uimm[5:2|7:6]" | "uimm[5:3|8:6]" => 6,
        _ => return None,
    };
    Some(n)
}

/// Width in bits of a named field for the given encoding length.
pub fn width(word_len: WordLen, name: &str) -> Option<u32> {
    match word_len {
        WordLen::W32 => width32(name),
        WordLen::W16 => width16(name),
    }
}
