//! The template compiler.
//!
//! A template is the instruction listing line from the standard: literal
//! bit groups and named operand fields, ending with the mnemonic, e.g.
//!
//! ```text
//! imm[11:0] rs1 000 rd 0010011 ADDI
//! ```
//!
//! Compilation turns the template into a `(mask, value)` pair: literal
//! bits contribute to both, field bits to neither. Any error here is a
//! configuration error reported at setup; a compiled descriptor can never
//! fail at run time.

use super::{fields, WordLen};

/// A configuration error in an instruction table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The template has no parts.
    #[error("empty instruction template")]
    EmptyTemplate,
    /// A field name is not in the width table for this encoding length.
    #[error("unknown field \"{field}\" in \"{template}\"")]
    UnknownField {
        /// The unrecognised field name.
        field: String,
        /// The full template.
        template: String,
    },
    /// The template's bits do not sum to the declared word length.
    #[error("\"{template}\" is {got} bits, expected {want}")]
    BitCount {
        /// The full template.
        template: String,
        /// Total bits found.
        got: u32,
        /// Bits required by the word length.
        want: u32,
    },
    /// An extension string named an unknown extension letter.
    #[error("unknown isa extension '{0}'")]
    UnknownExtension(char),
}

/// A compiled template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compiled {
    /// Mask of the fixed bits.
    pub mask: u32,
    /// Value of the fixed bits under `mask`.
    pub value: u32,
    /// Lower-cased mnemonic.
    pub mnemonic: String,
}

fn is_bits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b == b'0' || b == b'1')
}

/// Compiles `template` for the given encoding length.
pub fn compile(template: &str, word_len: WordLen) -> Result<Compiled, BuildError> {
    let mut parts: Vec<&str> = template.split_whitespace().collect();
    let mnemonic = parts.pop().ok_or(BuildError::EmptyTemplate)?;
    if parts.is_empty() {
        return Err(BuildError::EmptyTemplate);
    }

    let mut mask: u32 = 0;
    let mut value: u32 = 0;
    let mut nbits: u32 = 0;
    for part in parts {
        if is_bits(part) {
            for b in part.bytes() {
                mask = mask << 1 | 1;
                value = value << 1 | u32::from(b == b'1');
            }
            nbits += part.len() as u32;
        } else {
            let width =
                fields::width(word_len, part).ok_or_else(|| BuildError::UnknownField {
                    field: part.to_owned(),
                    template: template.to_owned(),
                })?;
            mask <<= width;
            value <<= width;
            nbits += width;
        }
        if nbits > 32 {
            break;
        }
    }

    if nbits != word_len.bits() {
        return Err(BuildError::BitCount {
            template: template.to_owned(),
            got: nbits,
            want: word_len.bits(),
        });
    }

    Ok(Compiled {
        mask,
        value,
        mnemonic: mnemonic.to_lowercase(),
    })
}
