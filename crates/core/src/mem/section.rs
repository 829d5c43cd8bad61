//! Byte-array backed memory regions.

use super::attr::Attr;
use super::region::Region;

/// A region backed by a plain byte buffer.
///
/// Sections are the workhorse region type: RAM, and every loadable ELF
/// section, is a `Section`.
pub struct Section {
    name: String,
    base: u64,
    attr: Attr,
    data: Vec<u8>,
}

impl Section {
    /// Creates a zero-filled section of `size` bytes at `base`.
    pub fn new(name: &str, base: u64, size: u64, attr: Attr) -> Self {
        Self {
            name: name.to_owned(),
            base,
            attr,
            data: vec![0; usize::try_from(size).unwrap_or(usize::MAX)],
        }
    }

    /// Copies `data` into the section starting at physical address `addr`.
    ///
    /// Bytes falling outside the section are silently dropped.
    pub fn fill(&mut self, addr: u64, data: &[u8]) {
        let Some(start) = addr.checked_sub(self.base) else {
            return;
        };
        let Ok(start) = usize::try_from(start) else {
            return;
        };
        if start >= self.data.len() {
            return;
        }
        let n = data.len().min(self.data.len() - start);
        self.data[start..start + n].copy_from_slice(&data[..n]);
    }
}

impl Region for Section {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn attr(&self) -> Attr {
        self.attr
    }

    fn set_attr(&mut self, attr: Attr) {
        self.attr = attr;
    }

    fn load(&self, addr: u64) -> u8 {
        self.data[(addr - self.base) as usize]
    }

    fn store(&mut self, addr: u64, val: u8) {
        self.data[(addr - self.base) as usize] = val;
    }
}
