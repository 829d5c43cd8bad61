//! Memory watchpoints.
//!
//! Watchpoints monitor accesses synchronously but never fault the access
//! itself: a hit sets a pending break which the CPU retrieves once per
//! instruction boundary. This keeps multi-access instructions (and the
//! page walker's own table reads) from trapping halfway through.

use super::attr::Attr;

/// State of a single watchpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BpState {
    /// Disabled; never triggers.
    Off,
    /// Armed; a matching access sets the pending break.
    On,
    /// Counting; matching accesses are recorded but never break.
    Skip,
}

/// A watchpoint on a span of the address space.
#[derive(Clone, Debug)]
pub struct Breakpoint {
    /// Display name.
    pub name: String,
    /// First address covered.
    pub addr: u64,
    /// Span size in bytes.
    pub size: u64,
    /// Which accesses trigger: any subset of [`Attr::R`], [`Attr::W`],
    /// [`Attr::X`].
    pub access: Attr,
    /// Current state.
    pub state: BpState,
    /// Number of matching accesses seen.
    pub hits: u64,
}

impl Breakpoint {
    fn matches(&self, addr: u64, n: u64, access: Attr) -> bool {
        if self.state == BpState::Off || !self.access.intersects(access) {
            return false;
        }
        // Overlap test between [addr, addr+n) and [self.addr, self.addr+size).
        addr < self.addr.saturating_add(self.size) && self.addr < addr.saturating_add(n.max(1))
    }
}

/// A triggered watchpoint, pending retrieval at the next instruction
/// boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingBreak {
    /// Name of the triggered watchpoint.
    pub name: String,
    /// Address of the access that triggered it.
    pub addr: u64,
    /// Kind of the access that triggered it.
    pub access: Attr,
}

/// The set of watchpoints installed on a memory map.
#[derive(Default)]
pub struct Breakpoints {
    list: Vec<Breakpoint>,
    pending: Option<PendingBreak>,
}

impl Breakpoints {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an armed watchpoint.
    pub fn add(&mut self, name: &str, addr: u64, size: u64, access: Attr) {
        self.list.push(Breakpoint {
            name: name.to_owned(),
            addr,
            size,
            access,
            state: BpState::On,
            hits: 0,
        });
    }

    /// Changes the state of every watchpoint named `name`. Returns the
    /// number of watchpoints updated.
    pub fn set_state(&mut self, name: &str, state: BpState) -> usize {
        let mut n = 0;
        for bp in self.list.iter_mut().filter(|bp| bp.name == name) {
            bp.state = state;
            n += 1;
        }
        n
    }

    /// Records an access, arming the pending break if a watchpoint
    /// triggers. The first trigger wins until the pending break is taken.
    pub fn check(&mut self, addr: u64, n: u64, access: Attr) {
        for bp in &mut self.list {
            if bp.matches(addr, n, access) {
                bp.hits += 1;
                if bp.state == BpState::On && self.pending.is_none() {
                    self.pending = Some(PendingBreak {
                        name: bp.name.clone(),
                        addr,
                        access,
                    });
                }
            }
        }
    }

    /// Takes the pending break, if one is armed.
    pub fn take_pending(&mut self) -> Option<PendingBreak> {
        self.pending.take()
    }

    /// Iterates over the installed watchpoints.
    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.list.iter()
    }
}
