//! Simulator configuration.
//!
//! A [`Config`] names everything a hart needs before any program is
//! loaded: register width, extension string, and the RAM region. It
//! deserializes from JSON with every field optional, or use
//! `Config::default()` directly.

use serde::Deserialize;

use crate::common::Xlen;
use crate::cpu::Cpu;
use crate::isa::BuildError;
use crate::mem::{Attr, Memory, Section};

/// Default configuration constants.
mod defaults {
    /// Base address of main RAM (2 GiB).
    pub const RAM_BASE: u64 = 0x8000_0000;

    /// Size of main RAM (128 MiB).
    pub const RAM_SIZE: u64 = 128 * 1024 * 1024;

    /// Default extension string: the general-purpose set plus
    /// compressed encodings.
    pub const EXTENSIONS: &str = "gc";
}

/// Root configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Register width of the hart.
    #[serde(default = "Config::default_xlen")]
    pub xlen: Xlen,

    /// Extension string, e.g. `"imac"` or `"gc"`. `g` expands to
    /// `imafd`; the base integer set is always present.
    #[serde(default = "Config::default_extensions")]
    pub extensions: String,

    /// Main RAM configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    fn default_xlen() -> Xlen {
        Xlen::Rv64
    }

    fn default_extensions() -> String {
        defaults::EXTENSIONS.to_owned()
    }

    /// Builds a hart with an empty RAM region per this configuration.
    /// The PC starts at the RAM base until a loaded image overrides the
    /// entry point.
    pub fn build(&self) -> Result<Cpu, BuildError> {
        let mut mem = Memory::new();
        mem.add(Box::new(Section::new(
            "ram",
            self.memory.ram_base,
            self.memory.ram_size,
            Attr::RWX,
        )));
        mem.set_entry(self.memory.ram_base);
        Cpu::new(self.xlen, &self.extensions, mem)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xlen: Xlen::Rv64,
            extensions: defaults::EXTENSIONS.to_owned(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Main RAM configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct MemoryConfig {
    /// RAM base address.
    #[serde(default = "MemoryConfig::default_ram_base")]
    pub ram_base: u64,

    /// RAM size in bytes.
    #[serde(default = "MemoryConfig::default_ram_size")]
    pub ram_size: u64,
}

impl MemoryConfig {
    fn default_ram_base() -> u64 {
        defaults::RAM_BASE
    }

    fn default_ram_size() -> u64 {
        defaults::RAM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
        }
    }
}
