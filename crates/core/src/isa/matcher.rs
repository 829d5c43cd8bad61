//! The instruction matcher.

use tracing::debug;

use super::parse::{self, BuildError};
use super::{DaFn, EmuFn, IsaModule, WordLen};

/// A compiled instruction descriptor.
pub struct Descriptor {
    /// Lower-cased mnemonic.
    pub mnemonic: String,
    /// Mask of the fixed bits.
    pub mask: u32,
    /// Value of the fixed bits under `mask`.
    pub value: u32,
    /// Encoding length.
    pub word_len: WordLen,
    /// Name of the module the descriptor came from.
    pub module: &'static str,
    /// Disassembly handler.
    pub da: DaFn,
    /// Emulation handler.
    pub emu: EmuFn,
}

impl Descriptor {
    fn matches(&self, word: u32) -> bool {
        word & self.mask == self.value
    }
}

/// A pair of descriptors that can both match some word, reported by
/// [`Isa::check_ambiguity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlap {
    /// Mnemonic of the earlier (winning) descriptor.
    pub first: String,
    /// Mnemonic of the later (shadowed) descriptor.
    pub second: String,
}

/// The configured instruction set of one simulator instance.
///
/// Lookup selects the 16- or 32-bit descriptor list from the low two bits
/// of the word and returns the first descriptor whose fixed bits match.
/// First match in declaration order is the documented tie-break: the
/// constrained encodings (C.NOP before C.ADDI, the hint slots) are listed
/// before the general patterns that cover them.
#[derive(Default)]
pub struct Isa {
    ins16: Vec<Descriptor>,
    ins32: Vec<Descriptor>,
}

impl Isa {
    /// Creates an empty instruction set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the given modules into this set, in order.
    pub fn add(&mut self, modules: &[&'static IsaModule]) -> Result<(), BuildError> {
        for module in modules {
            for defn in module.defns {
                let c = parse::compile(defn.template, module.word_len)?;
                let desc = Descriptor {
                    mnemonic: c.mnemonic,
                    mask: c.mask,
                    value: c.value,
                    word_len: module.word_len,
                    module: module.name,
                    da: defn.da,
                    emu: defn.emu,
                };
                match module.word_len {
                    WordLen::W16 => self.ins16.push(desc),
                    WordLen::W32 => self.ins32.push(desc),
                }
            }
            debug!(module = module.name, "isa module added");
        }
        Ok(())
    }

    /// Finds the descriptor for an instruction word, if any. A word whose
    /// low two bits are `11` is a 32-bit encoding, anything else a 16-bit
    /// one.
    pub fn lookup(&self, word: u32) -> Option<&Descriptor> {
        let list = if word & 3 == 3 {
            &self.ins32
        } else {
            &self.ins16
        };
        list.iter().find(|d| d.matches(word))
    }

    /// Number of compiled descriptors.
    pub fn len(&self) -> usize {
        self.ins16.len() + self.ins32.len()
    }

    /// True if no modules have been added.
    pub fn is_empty(&self) -> bool {
        self.ins16.is_empty() && self.ins32.is_empty()
    }

    /// Iterates over every descriptor, 16-bit list first.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.ins16.iter().chain(self.ins32.iter())
    }

    /// Reports every pair of equal-length descriptors that can both match
    /// some word. Declaration order remains authoritative; this is a
    /// diagnostic for spotting accidental shadowing when modules are
    /// combined.
    pub fn check_ambiguity(&self) -> Vec<Overlap> {
        let mut out = Vec::new();
        for list in [&self.ins16, &self.ins32] {
            for (i, a) in list.iter().enumerate() {
                for b in &list[i + 1..] {
                    // Two patterns overlap iff they agree on every bit
                    // fixed in both.
                    let common = a.mask & b.mask;
                    if (a.value ^ b.value) & common == 0 {
                        out.push(Overlap {
                            first: a.mnemonic.clone(),
                            second: b.mnemonic.clone(),
                        });
                    }
                }
            }
        }
        out
    }
}
