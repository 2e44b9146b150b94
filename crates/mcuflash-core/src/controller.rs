//! Flash controller abstraction
//!
//! [`FlashController`] is the seam between the driver and the hardware:
//! the lock/unlock protection sequence, the halfword program and page
//! erase commands (each blocking until the controller reports done), and
//! reads from the memory-mapped flash range. The driver validates every
//! request before it reaches the controller, so implementations may
//! assume in-bounds addresses.
//!
//! [`UnlockGuard`] brackets program and erase sequences: the controller
//! is unlocked on construction and locked again when the guard drops,
//! on success and on error paths alike.

use core::ops::{Deref, DerefMut};

use crate::error::Result;

/// Hardware interface to the flash controller
///
/// Program and erase commands are synchronous: they issue the command,
/// busy-wait on controller status and report the final done/error state.
/// Both require the controller to be unlocked first.
pub trait FlashController {
    /// Disengage write protection on the controller
    fn unlock(&mut self);

    /// Re-engage write protection on the controller
    fn lock(&mut self);

    /// Program one halfword at `addr` and wait for completion
    ///
    /// `addr` must be halfword aligned. Returns
    /// [`Error::ProgramFailed`](crate::Error::ProgramFailed) when the
    /// controller status after the command is not "done".
    fn program_halfword(&mut self, addr: u32, value: u16) -> Result<()>;

    /// Erase the page starting at `addr` and wait for completion
    ///
    /// `addr` must be page aligned. Returns
    /// [`Error::EraseFailed`](crate::Error::EraseFailed) when the
    /// controller status after the command is not "done".
    fn erase_page(&mut self, addr: u32) -> Result<()>;

    /// Copy bytes from the memory-mapped flash range into `buf`
    ///
    /// The caller guarantees `addr..addr + buf.len()` lies inside the
    /// mapped region.
    fn read(&self, addr: u32, buf: &mut [u8]);

    /// Read back one halfword, in address order
    fn read_halfword(&self, addr: u32) -> u16 {
        let mut bytes = [0u8; 2];
        self.read(addr, &mut bytes);
        u16::from_le_bytes(bytes)
    }
}

/// Scoped write-enable bracket around a controller
///
/// Unlocks the controller on construction and locks it again when
/// dropped, so an early return out of a program or erase loop can never
/// leave the controller permanently unlocked.
pub struct UnlockGuard<'a, C: FlashController + ?Sized> {
    ctrl: &'a mut C,
}

impl<'a, C: FlashController + ?Sized> UnlockGuard<'a, C> {
    /// Unlock the controller and return the guard
    pub fn new(ctrl: &'a mut C) -> Self {
        ctrl.unlock();
        Self { ctrl }
    }
}

impl<C: FlashController + ?Sized> Deref for UnlockGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctrl
    }
}

impl<C: FlashController + ?Sized> DerefMut for UnlockGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctrl
    }
}

impl<C: FlashController + ?Sized> Drop for UnlockGuard<'_, C> {
    fn drop(&mut self) {
        self.ctrl.lock();
    }
}
