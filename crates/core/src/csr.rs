//! Control and status registers.
//!
//! The CSR file is the privileged-state collaborator of the CPU: it owns
//! the privilege mode, `mstatus`, `satp`, and the trap bookkeeping
//! registers, and answers the queries the address translator needs
//! (effective privilege, MXR, SUM, VM scheme, root PPN) so the memory
//! subsystem never touches CSR state directly.
//!
//! Register numbers encode their own access rules: bits 9:8 give the
//! lowest privilege that may access the register, and a register whose
//! bits 11:10 are `11` is read-only.

use crate::common::{PrivMode, Xlen};
use crate::mem::VmMode;

/// Well-known CSR numbers.
pub mod addr {
    /// Floating point accrued exception flags.
    pub const FFLAGS: u32 = 0x001;
    /// Floating point dynamic rounding mode.
    pub const FRM: u32 = 0x002;
    /// Floating point control and status.
    pub const FCSR: u32 = 0x003;
    /// Supervisor status (restricted `mstatus` view).
    pub const SSTATUS: u32 = 0x100;
    /// Supervisor interrupt enable.
    pub const SIE: u32 = 0x104;
    /// Supervisor trap vector.
    pub const STVEC: u32 = 0x105;
    /// Supervisor counter enable.
    pub const SCOUNTEREN: u32 = 0x106;
    /// Supervisor scratch.
    pub const SSCRATCH: u32 = 0x140;
    /// Supervisor exception program counter.
    pub const SEPC: u32 = 0x141;
    /// Supervisor trap cause.
    pub const SCAUSE: u32 = 0x142;
    /// Supervisor trap value.
    pub const STVAL: u32 = 0x143;
    /// Supervisor interrupt pending.
    pub const SIP: u32 = 0x144;
    /// Supervisor address translation and protection.
    pub const SATP: u32 = 0x180;
    /// Machine status.
    pub const MSTATUS: u32 = 0x300;
    /// Machine ISA.
    pub const MISA: u32 = 0x301;
    /// Machine exception delegation.
    pub const MEDELEG: u32 = 0x302;
    /// Machine interrupt delegation.
    pub const MIDELEG: u32 = 0x303;
    /// Machine interrupt enable.
    pub const MIE: u32 = 0x304;
    /// Machine trap vector.
    pub const MTVEC: u32 = 0x305;
    /// Machine counter enable.
    pub const MCOUNTEREN: u32 = 0x306;
    /// Machine scratch.
    pub const MSCRATCH: u32 = 0x340;
    /// Machine exception program counter.
    pub const MEPC: u32 = 0x341;
    /// Machine trap cause.
    pub const MCAUSE: u32 = 0x342;
    /// Machine trap value.
    pub const MTVAL: u32 = 0x343;
    /// Machine interrupt pending.
    pub const MIP: u32 = 0x344;
    /// Cycle counter (user read-only shadow).
    pub const CYCLE: u32 = 0xC00;
    /// Wall-clock counter.
    pub const TIME: u32 = 0xC01;
    /// Retired instruction counter.
    pub const INSTRET: u32 = 0xC02;
    /// Upper half of `cycle` (RV32 only).
    pub const CYCLEH: u32 = 0xC80;
    /// Upper half of `instret` (RV32 only).
    pub const INSTRETH: u32 = 0xC82;
    /// Machine vendor id.
    pub const MVENDORID: u32 = 0xF11;
    /// Machine architecture id.
    pub const MARCHID: u32 = 0xF12;
    /// Machine implementation id.
    pub const MIMPID: u32 = 0xF13;
    /// Hart id.
    pub const MHARTID: u32 = 0xF14;
}

// mstatus bit positions.
const STATUS_SIE: u64 = 1 << 1;
const STATUS_MIE: u64 = 1 << 3;
const STATUS_SPIE: u64 = 1 << 5;
const STATUS_MPIE: u64 = 1 << 7;
const STATUS_SPP: u64 = 1 << 8;
const STATUS_MPP_SHIFT: u32 = 11;
const STATUS_MPP: u64 = 3 << STATUS_MPP_SHIFT;
const STATUS_FS: u64 = 3 << 13;
const STATUS_MPRV: u64 = 1 << 17;
const STATUS_SUM: u64 = 1 << 18;
const STATUS_MXR: u64 = 1 << 19;

/// The bits of `mstatus` visible through `sstatus`.
const SSTATUS_MASK: u64 =
    STATUS_SIE | STATUS_SPIE | STATUS_SPP | STATUS_FS | STATUS_SUM | STATUS_MXR;

/// A failed CSR access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CsrError {
    /// The register number is not implemented.
    #[error("unimplemented csr {0:#05x}")]
    Unknown(u32),
    /// The current privilege mode may not access the register.
    #[error("insufficient privilege for csr {0:#05x}")]
    Privilege(u32),
    /// Write to a read-only register.
    #[error("csr {0:#05x} is read-only")]
    ReadOnly(u32),
}

/// The CSR file of a single hart.
pub struct Csr {
    xlen: Xlen,
    mode: PrivMode,
    mstatus: u64,
    misa: u64,
    medeleg: u64,
    mideleg: u64,
    mie: u64,
    mip: u64,
    mtvec: u64,
    mcounteren: u64,
    mscratch: u64,
    mepc: u64,
    mcause: u64,
    mtval: u64,
    stvec: u64,
    scounteren: u64,
    sscratch: u64,
    sepc: u64,
    scause: u64,
    stval: u64,
    satp: u64,
    fcsr: u64,
    /// Cycle counter, bumped by the CPU each step.
    pub cycle: u64,
    /// Retired instruction counter.
    pub instret: u64,
}

impl Csr {
    /// Creates a CSR file starting in machine mode. `extensions` is the
    /// lower-case extension letters to advertise in `misa` (e.g.
    /// `"imafdc"`).
    pub fn new(xlen: Xlen, extensions: &str) -> Self {
        let mut misa: u64 = 0;
        for c in extensions.chars().filter(char::is_ascii_lowercase) {
            misa |= 1 << (c as u32 - 'a' as u32);
        }
        misa |= match xlen {
            Xlen::Rv32 => 1 << 30,
            Xlen::Rv64 => 2 << 62,
        };
        Self {
            xlen,
            mode: PrivMode::Machine,
            mstatus: 0,
            misa,
            medeleg: 0,
            mideleg: 0,
            mie: 0,
            mip: 0,
            mtvec: 0,
            mcounteren: 0,
            mscratch: 0,
            mepc: 0,
            mcause: 0,
            mtval: 0,
            stvec: 0,
            scounteren: 0,
            sscratch: 0,
            sepc: 0,
            scause: 0,
            stval: 0,
            satp: 0,
            fcsr: 0,
            cycle: 0,
            instret: 0,
        }
    }

    /// Current privilege mode.
    pub fn mode(&self) -> PrivMode {
        self.mode
    }

    /// Forces the privilege mode; used by loaders and tests.
    pub fn set_mode(&mut self, mode: PrivMode) {
        self.mode = mode;
    }

    /// Effective privilege mode for data accesses: `mstatus.MPRV`
    /// substitutes `MPP`.
    pub fn effective_mode(&self) -> PrivMode {
        if self.mstatus & STATUS_MPRV != 0 {
            PrivMode::from_bits(self.mstatus >> STATUS_MPP_SHIFT)
        } else {
            self.mode
        }
    }

    /// `mstatus.MXR`.
    pub fn mxr(&self) -> bool {
        self.mstatus & STATUS_MXR != 0
    }

    /// `mstatus.SUM`.
    pub fn sum(&self) -> bool {
        self.mstatus & STATUS_SUM != 0
    }

    /// The translation scheme selected by `satp`.
    pub fn vm_mode(&self) -> VmMode {
        match self.xlen {
            Xlen::Rv32 => {
                if self.satp >> 31 & 1 != 0 {
                    VmMode::Sv32
                } else {
                    VmMode::Bare
                }
            }
            Xlen::Rv64 => match self.satp >> 60 {
                8 => VmMode::Sv39,
                _ => VmMode::Bare,
            },
        }
    }

    /// Root page table PPN from `satp`.
    pub fn root_ppn(&self) -> u64 {
        match self.xlen {
            Xlen::Rv32 => self.satp & 0x3F_FFFF,
            Xlen::Rv64 => self.satp & 0xFFF_FFFF_FFFF,
        }
    }

    /// Accrued floating point exception flags (`fflags`).
    pub fn fflags(&self) -> u64 {
        self.fcsr & 0x1F
    }

    /// ORs `flags` into `fflags`.
    pub fn raise_fflags(&mut self, flags: u64) {
        self.fcsr |= flags & 0x1F;
    }

    /// Dynamic rounding mode (`frm`).
    pub fn frm(&self) -> u64 {
        (self.fcsr >> 5) & 7
    }

    fn can_access(&self, reg: u32) -> bool {
        self.mode >= PrivMode::from_bits(u64::from(reg >> 8))
    }

    fn is_read_only(reg: u32) -> bool {
        (reg >> 10) & 3 == 3
    }

    /// Masks a written value to the register width.
    fn narrow(&self, val: u64) -> u64 {
        val & self.xlen.addr_mask()
    }

    /// Reads a CSR, checking privilege.
    pub fn read(&self, reg: u32) -> Result<u64, CsrError> {
        if !self.can_access(reg) {
            return Err(CsrError::Privilege(reg));
        }
        let val = match reg {
            addr::FFLAGS => self.fflags(),
            addr::FRM => self.frm(),
            addr::FCSR => self.fcsr,
            addr::SSTATUS => self.mstatus & SSTATUS_MASK,
            addr::SIE => self.mie & self.mideleg,
            addr::STVEC => self.stvec,
            addr::SCOUNTEREN => self.scounteren,
            addr::SSCRATCH => self.sscratch,
            addr::SEPC => self.sepc,
            addr::SCAUSE => self.scause,
            addr::STVAL => self.stval,
            addr::SIP => self.mip & self.mideleg,
            addr::SATP => self.satp,
            addr::MSTATUS => self.mstatus,
            addr::MISA => self.misa,
            addr::MEDELEG => self.medeleg,
            addr::MIDELEG => self.mideleg,
            addr::MIE => self.mie,
            addr::MTVEC => self.mtvec,
            addr::MCOUNTEREN => self.mcounteren,
            addr::MSCRATCH => self.mscratch,
            addr::MEPC => self.mepc,
            addr::MCAUSE => self.mcause,
            addr::MTVAL => self.mtval,
            addr::MIP => self.mip,
            addr::CYCLE | addr::TIME => self.cycle,
            addr::INSTRET => self.instret,
            addr::CYCLEH if self.xlen == Xlen::Rv32 => self.cycle >> 32,
            addr::INSTRETH if self.xlen == Xlen::Rv32 => self.instret >> 32,
            addr::MVENDORID | addr::MARCHID | addr::MIMPID | addr::MHARTID => 0,
            _ => return Err(CsrError::Unknown(reg)),
        };
        Ok(self.narrow(val))
    }

    /// Writes a CSR, checking privilege and writability.
    pub fn write(&mut self, reg: u32, val: u64) -> Result<(), CsrError> {
        if Self::is_read_only(reg) {
            return Err(CsrError::ReadOnly(reg));
        }
        if !self.can_access(reg) {
            return Err(CsrError::Privilege(reg));
        }
        let val = self.narrow(val);
        match reg {
            addr::FFLAGS => self.fcsr = (self.fcsr & !0x1F) | (val & 0x1F),
            addr::FRM => self.fcsr = (self.fcsr & !0xE0) | ((val & 7) << 5),
            addr::FCSR => self.fcsr = val & 0xFF,
            addr::SSTATUS => {
                self.mstatus = (self.mstatus & !SSTATUS_MASK) | (val & SSTATUS_MASK);
            }
            addr::SIE => self.mie = (self.mie & !self.mideleg) | (val & self.mideleg),
            addr::STVEC => self.stvec = val & !3,
            addr::SCOUNTEREN => self.scounteren = val,
            addr::SSCRATCH => self.sscratch = val,
            // IALIGN is 16 with the compressed extension, so only bit 0
            // of an exception PC is hardwired to zero.
            addr::SEPC => self.sepc = val & !1,
            addr::SCAUSE => self.scause = val,
            addr::STVAL => self.stval = val,
            addr::SIP => self.mip = (self.mip & !self.mideleg) | (val & self.mideleg),
            addr::SATP => self.write_satp(val),
            addr::MSTATUS => self.mstatus = val,
            // misa is WARL; this implementation fixes it at reset.
            addr::MISA => {}
            addr::MEDELEG => self.medeleg = val,
            addr::MIDELEG => self.mideleg = val,
            addr::MIE => self.mie = val,
            addr::MTVEC => self.mtvec = val & !3,
            addr::MCOUNTEREN => self.mcounteren = val,
            addr::MSCRATCH => self.mscratch = val,
            addr::MEPC => self.mepc = val & !1,
            addr::MCAUSE => self.mcause = val,
            addr::MTVAL => self.mtval = val,
            addr::MIP => self.mip = val,
            _ => return Err(CsrError::Unknown(reg)),
        }
        Ok(())
    }

    /// `satp` is WARL: unsupported translation schemes leave the register
    /// unchanged.
    fn write_satp(&mut self, val: u64) {
        match self.xlen {
            Xlen::Rv32 => self.satp = val,
            Xlen::Rv64 => {
                if matches!(val >> 60, 0 | 8) {
                    self.satp = val;
                }
            }
        }
    }

    /// Machine-mode exception return. Restores the pre-trap interrupt
    /// enable and privilege mode and returns the PC to resume at.
    pub fn mret(&mut self) -> u64 {
        let mpie = self.mstatus & STATUS_MPIE != 0;
        self.mstatus = if mpie {
            self.mstatus | STATUS_MIE
        } else {
            self.mstatus & !STATUS_MIE
        };
        self.mode = PrivMode::from_bits(self.mstatus >> STATUS_MPP_SHIFT);
        self.mstatus |= STATUS_MPIE;
        self.mstatus &= !STATUS_MPP;
        if self.mode != PrivMode::Machine {
            self.mstatus &= !STATUS_MPRV;
        }
        self.mepc
    }

    /// Supervisor-mode exception return.
    pub fn sret(&mut self) -> u64 {
        let spie = self.mstatus & STATUS_SPIE != 0;
        self.mstatus = if spie {
            self.mstatus | STATUS_SIE
        } else {
            self.mstatus & !STATUS_SIE
        };
        self.mode = if self.mstatus & STATUS_SPP != 0 {
            PrivMode::Supervisor
        } else {
            PrivMode::User
        };
        self.mstatus |= STATUS_SPIE;
        self.mstatus &= !STATUS_SPP;
        if self.mode != PrivMode::Machine {
            self.mstatus &= !STATUS_MPRV;
        }
        self.sepc
    }
}
