//! Raw instruction encoders.
//!
//! Each helper assembles one 32-bit format from its fields, so tests can
//! state operands instead of hand-packed hex.

/// Encodes an R-type instruction.
pub fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
    (funct7 & 0x7F) << 25
        | (rs2 & 0x1F) << 20
        | (rs1 & 0x1F) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1F) << 7
        | (opcode & 0x7F)
}

/// Encodes an I-type instruction.
pub fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i32) -> u32 {
    ((imm as u32) & 0xFFF) << 20
        | (rs1 & 0x1F) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1F) << 7
        | (opcode & 0x7F)
}

/// Encodes an S-type instruction.
pub fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    (v >> 5 & 0x7F) << 25
        | (rs2 & 0x1F) << 20
        | (rs1 & 0x1F) << 15
        | (funct3 & 0x7) << 12
        | (v & 0x1F) << 7
        | (opcode & 0x7F)
}

/// Encodes a B-type instruction. `imm` is the byte offset.
pub fn b_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    (v >> 12 & 1) << 31
        | (v >> 5 & 0x3F) << 25
        | (rs2 & 0x1F) << 20
        | (rs1 & 0x1F) << 15
        | (funct3 & 0x7) << 12
        | (v >> 1 & 0xF) << 8
        | (v >> 11 & 1) << 7
        | (opcode & 0x7F)
}

/// Encodes a U-type instruction. `imm` is the pre-shift 20-bit value.
pub fn u_type(opcode: u32, rd: u32, imm: u32) -> u32 {
    (imm & 0xF_FFFF) << 12 | (rd & 0x1F) << 7 | (opcode & 0x7F)
}

/// Encodes a J-type instruction. `imm` is the byte offset.
pub fn j_type(opcode: u32, rd: u32, imm: i32) -> u32 {
    let v = imm as u32;
    (v >> 20 & 1) << 31
        | (v >> 1 & 0x3FF) << 21
        | (v >> 11 & 1) << 20
        | (v >> 12 & 0xFF) << 12
        | (rd & 0x1F) << 7
        | (opcode & 0x7F)
}
