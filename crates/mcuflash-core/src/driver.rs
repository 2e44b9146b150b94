//! Read, program and erase operations
//!
//! [`FlashDriver`] binds a [`FlashRegion`] to a [`FlashController`] and
//! implements the three flash operations. Each operation validates its
//! own inputs before any hardware access; program and erase run inside
//! an [`UnlockGuard`] so the controller is locked again on every exit
//! path. The driver performs no retries and no rollback: on a hardware
//! failure the units completed before the failing one stay as they are.

use crate::controller::{FlashController, UnlockGuard};
use crate::error::{Error, Result};
use crate::region::FlashRegion;

/// Driver for one on-chip flash region
pub struct FlashDriver<C> {
    region: FlashRegion,
    ctrl: C,
}

impl<C: FlashController> FlashDriver<C> {
    /// Create a driver for `region` backed by `ctrl`
    pub fn new(region: FlashRegion, ctrl: C) -> Self {
        Self { region, ctrl }
    }

    /// The region this driver operates on
    pub fn region(&self) -> FlashRegion {
        self.region
    }

    /// Borrow the underlying controller
    pub fn controller(&self) -> &C {
        &self.ctrl
    }

    /// Mutably borrow the underlying controller
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.ctrl
    }

    /// Consume the driver and return the controller
    pub fn into_controller(self) -> C {
        self.ctrl
    }

    fn validate(&self, addr: u32, len: usize, what: &str) -> Result<()> {
        match self.region.validate(addr, len) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::error!("{} outside flash region: {}", what, e);
                Err(e)
            }
        }
    }

    /// Read `buf.len()` bytes starting at `addr`
    ///
    /// Byte granular, no alignment requirement. The buffer is filled in
    /// address order; there are no partial reads. Returns the number of
    /// bytes read, which equals `buf.len()` on success.
    pub fn read(&self, addr: u32, buf: &mut [u8]) -> Result<usize> {
        self.validate(addr, buf.len(), "read")?;
        self.ctrl.read(addr, buf);
        Ok(buf.len())
    }

    /// Program `data` starting at `addr`, one halfword at a time
    ///
    /// Both `addr` and `data.len()` must be even. The target range must
    /// have been erased first: programming can only clear bits, so
    /// writing over non-erased cells yields a verify mismatch (or silent
    /// corruption on hardware that does not report it).
    ///
    /// Every programmed halfword is read back and compared. On a program
    /// failure or verify mismatch the operation stops at the failing
    /// halfword; earlier halfwords remain programmed. The controller is
    /// locked again regardless of the outcome. Returns the number of
    /// bytes written, which equals `data.len()` on success.
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<usize> {
        self.validate(addr, data.len(), "write")?;
        if addr % 2 != 0 || data.len() % 2 != 0 {
            log::error!(
                "write requires halfword alignment: addr 0x{:08X}, len {}",
                addr,
                data.len()
            );
            return Err(Error::Unaligned {
                addr,
                len: data.len(),
            });
        }

        let mut guard = UnlockGuard::new(&mut self.ctrl);
        let mut cur = addr;
        for pair in data.chunks_exact(2) {
            let value = u16::from_le_bytes([pair[0], pair[1]]);
            guard.program_halfword(cur, value)?;
            let readback = guard.read_halfword(cur);
            if readback != value {
                log::error!(
                    "verify mismatch at 0x{:08X}: wrote 0x{:04X}, read 0x{:04X}",
                    cur,
                    value,
                    readback
                );
                return Err(Error::VerifyMismatch {
                    addr: cur,
                    wrote: value,
                    read: readback,
                });
            }
            cur += 2;
        }
        drop(guard);

        Ok(data.len())
    }

    /// Erase every page overlapping `addr..addr + len`
    ///
    /// The requested range is bounds-checked as given; the working
    /// address is then aligned down to the containing page boundary, so
    /// bytes before `addr` that share its first page are erased too, and
    /// the erased size is always a multiple of the page size and at
    /// least `len`. Callers that need "only my bytes change" semantics
    /// must align their requests to page boundaries themselves.
    ///
    /// Pages are erased in address order; on a hardware failure the
    /// operation stops and pages erased before the failing one stay
    /// erased. The controller is locked again regardless of the outcome.
    /// Erasure is irreversible. Returns the number of bytes erased.
    pub fn erase(&mut self, addr: u32, len: usize) -> Result<usize> {
        self.validate(addr, len, "erase")?;

        let end = addr as u64 + len as u64;
        let page = self.region.page_size();
        let start = self.region.page_start(addr);
        let mut cur = start as u64;
        let mut erased = 0usize;

        let mut guard = UnlockGuard::new(&mut self.ctrl);
        while cur < end {
            guard.erase_page(cur as u32)?;
            cur += page as u64;
            erased += page as usize;
        }
        drop(guard);

        log::debug!("erase done: addr 0x{:08X}, size {}", start, erased);
        Ok(erased)
    }
}
