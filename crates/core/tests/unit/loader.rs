//! Program loading tests.

use pretty_assertions::assert_eq;
use rvemu_core::{load_binary, Config};

#[test]
fn flat_binary_boots_from_the_entry_point() {
    // addi a0, zero, 7 ; addi a0, a0, 35
    let mut image = Vec::new();
    image.extend_from_slice(&0x0070_0513u32.to_le_bytes());
    image.extend_from_slice(&0x0235_0513u32.to_le_bytes());

    let mut cpu = Config::default().build().expect("default config builds");
    let base = cpu.pc();
    load_binary(&mut cpu.mem, base, &image).expect("binary lands in ram");

    cpu.run(Some(2)).expect("program executes");
    assert_eq!(cpu.rd_x(10), 42);
    assert_eq!(cpu.pc(), base + 8);
}

#[test]
fn binary_outside_mapped_memory_is_an_error() {
    let mut cpu = Config::default().build().expect("default config builds");
    assert!(load_binary(&mut cpu.mem, 0x1000, &[0x13, 0, 0, 0]).is_err());
}

#[test]
fn symbols_resolve_addresses() {
    let mut cpu = Config::default().build().expect("default config builds");
    cpu.mem.symbols.add("main", 0x8000_0000, 0x40);
    cpu.mem.symbols.add("helper", 0x8000_0040, 0x10);
    let main = cpu.mem.symbols.find(0x8000_0010).expect("inside main");
    assert_eq!(main.name, "main");
    assert!(cpu.mem.symbols.by_name("helper").is_some());
    assert!(cpu.mem.symbols.find(0x9000_0000).is_none());
}
