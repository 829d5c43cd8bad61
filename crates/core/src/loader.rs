//! Program loading.
//!
//! An ELF image populates a [`Memory`] directly: every allocatable
//! section becomes an attributed region, the symbol table fills the
//! memory's symbols, and the ELF entry point becomes the memory's entry.
//! Anything that is not an ELF can be placed with [`load_binary`] into a
//! region that already exists.

use object::{Object, ObjectSection, ObjectSymbol};
use tracing::debug;

use crate::mem::{Attr, Memory, MemFault, Section};

/// Why an image could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The image is not a parseable object file.
    #[error("malformed image: {0}")]
    Parse(#[from] object::Error),
    /// A section's contents could not be placed in memory.
    #[error(transparent)]
    Memory(#[from] MemFault),
}

fn section_attr(flags: object::SectionFlags) -> Option<Attr> {
    let object::SectionFlags::Elf { sh_flags } = flags else {
        return None;
    };
    if sh_flags & u64::from(object::elf::SHF_ALLOC) == 0 {
        return None;
    }
    let mut attr = Attr::R;
    if sh_flags & u64::from(object::elf::SHF_WRITE) != 0 {
        attr |= Attr::W;
    }
    if sh_flags & u64::from(object::elf::SHF_EXECINSTR) != 0 {
        attr |= Attr::X;
    }
    Some(attr)
}

/// Loads an ELF image (32- or 64-bit) into `mem`.
///
/// Allocatable sections become regions named after the section, with
/// permissions derived from the section flags; NOBITS sections (`.bss`)
/// come up zeroed. Symbols with names land in the symbol table, and the
/// entry point is recorded so a new hart starts there.
pub fn load_elf(mem: &mut Memory, data: &[u8]) -> Result<(), LoadError> {
    let file = object::File::parse(data)?;

    for section in file.sections() {
        let Some(attr) = section_attr(section.flags()) else {
            continue;
        };
        let size = section.size();
        if size == 0 {
            continue;
        }
        let name = section.name()?;
        let base = section.address();
        let mut region = Section::new(name, base, size, attr);
        // NOBITS sections have no file contents
        let contents = section.data()?;
        region.fill(base, contents);
        debug!(name, base = format_args!("{base:#x}"), size, %attr, "elf section");
        mem.add(Box::new(region));
    }

    for symbol in file.symbols() {
        let name = symbol.name()?;
        if name.is_empty() {
            continue;
        }
        mem.symbols.add(name, symbol.address(), symbol.size());
    }

    mem.set_entry(file.entry());
    Ok(())
}

/// Places a flat binary at `base` in already-mapped memory and records
/// `base` as the entry point.
pub fn load_binary(mem: &mut Memory, base: u64, data: &[u8]) -> Result<(), LoadError> {
    mem.load_image(base, data)?;
    mem.set_entry(base);
    Ok(())
}

/// True if the image carries the ELF magic.
pub fn is_elf(data: &[u8]) -> bool {
    data.starts_with(&[0x7F, b'E', b'L', b'F'])
}
