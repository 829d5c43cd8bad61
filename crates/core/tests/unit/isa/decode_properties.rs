//! Decode table lookups.
//!
//! Known encodings across every extension must resolve to their
//! mnemonic, and the matcher must be internally consistent: whatever it
//! returns actually matches the word, at the length the low bits select.

use proptest::prelude::*;
use rstest::rstest;
use rvemu_core::isa::{self, Isa, WordLen};

use crate::common::builder::i_type;

fn rv64gc() -> Isa {
    let mut i = Isa::new();
    i.add(&isa::rv64gc()).expect("tables compile");
    i
}

fn rv32gc() -> Isa {
    let mut i = Isa::new();
    i.add(&isa::rv32gc()).expect("tables compile");
    i
}

#[rstest]
// base integer
#[case(0x0000_0013, "addi")]
#[case(0xFE01_0113, "addi")]
#[case(0x00B5_0533, "add")]
#[case(0x40B5_0533, "sub")]
#[case(0x0005_A503, "lw")]
#[case(0x00A5_A023, "sw")]
#[case(0x0080_00EF, "jal")]
#[case(0x0000_8067, "jalr")]
#[case(0x0000_0463, "beq")]
#[case(0x1234_5537, "lui")]
#[case(0x0000_0517, "auipc")]
#[case(0x0000_100F, "fence.i")]
#[case(0x0000_0073, "ecall")]
#[case(0x0010_0073, "ebreak")]
#[case(0xC000_2573, "csrrs")]
// privileged
#[case(0x1020_0073, "sret")]
#[case(0x3020_0073, "mret")]
#[case(0x1050_0073, "wfi")]
#[case(0x1200_0073, "sfence.vma")]
// m extension
#[case(0x02C5_8533, "mul")]
#[case(0x02C5_C533, "div")]
// a extension
#[case(0x1006_252F, "lr.w")]
#[case(0x18B6_252F, "sc.w")]
#[case(0x00B6_252F, "amoadd.w")]
// f/d extensions
#[case(0x0020_8053, "fadd.s")]
#[case(0x0220_8053, "fadd.d")]
#[case(0x0005_2007, "flw")]
// rv64 widenings
#[case(0x0015_051B, "addiw")]
#[case(0x0005_B503, "ld")]
#[case(0x00A5_B023, "sd")]
#[case(0x00B6_352F, "amoadd.d")]
// compressed
#[case(0x4705, "c.li")]
#[case(0x8082, "c.jr")]
#[case(0x852E, "c.mv")]
#[case(0x952E, "c.add")]
#[case(0x4502, "c.lwsp")]
#[case(0xC02A, "c.swsp")]
#[case(0xA001, "c.j")]
#[case(0x629C, "c.ld")]
#[case(0xE298, "c.sd")]
fn rv64gc_known_encodings(#[case] word: u32, #[case] mnemonic: &str) {
    assert_eq!(rv64gc().lookup(word).expect("decodes").mnemonic, mnemonic);
}

#[rstest]
#[case(0x2001, "c.jal")]
#[case(0x0005_2007, "flw")]
fn rv32_specific_encodings(#[case] word: u32, #[case] mnemonic: &str) {
    assert_eq!(rv32gc().lookup(word).expect("decodes").mnemonic, mnemonic);
}

#[test]
fn rv64_loses_c_jal_to_c_addiw() {
    // the same opcode space holds c.jal on rv32 and c.addiw on rv64
    let isa = rv64gc();
    let d = isa.lookup(0x2501).expect("decodes");
    assert_eq!(d.mnemonic, "c.addiw");
}

#[test]
fn extension_gating() {
    let mut bare = Isa::new();
    bare.add(&isa::modules(rvemu_core::Xlen::Rv64, "i").expect("valid set"))
        .expect("tables compile");
    assert!(bare.lookup(0x02C5_8533).is_none()); // mul
    assert!(bare.lookup(0x0020_8053).is_none()); // fadd.s
    assert!(bare.lookup(0x4705).is_none()); // c.li
    assert!(bare.lookup(0x0000_0013).is_some());
}

proptest! {
    #[test]
    fn lookup_is_consistent_with_its_descriptor(word: u32) {
        let isa = rv64gc();
        if let Some(d) = isa.lookup(word) {
            prop_assert_eq!(word & d.mask, d.value);
            let expect = if word & 3 == 3 { WordLen::W32 } else { WordLen::W16 };
            prop_assert_eq!(d.word_len, expect);
        }
    }

    #[test]
    fn every_addi_encoding_decodes_to_addi(rd in 0u32..32, rs1 in 0u32..32, imm in -2048i32..2048) {
        let isa = rv64gc();
        let word = i_type(0x13, rd, 0, rs1, imm);
        prop_assert_eq!(&isa.lookup(word).expect("decodes").mnemonic, "addi");
    }
}
