//! mcuflash-mock - In-memory flash controller emulator for testing
//!
//! This crate provides a mock flash controller that emulates the
//! on-chip flash in memory: the erased value is 0xFF, programming can
//! only clear bits, and the lock/unlock protection state is tracked so
//! tests can assert that the engine re-locks the controller on every
//! exit path. Program and erase failures can be injected per address
//! to exercise the error paths without real hardware.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use mcuflash_core::error::{Error, Result};
use mcuflash_core::{FlashController, FlashRegion};

/// The value every cell reads as after a successful erase
pub const ERASED_VALUE: u8 = 0xFF;

/// Configuration for the mock flash
#[derive(Debug, Clone, Copy)]
pub struct MockConfig {
    /// Base address the flash is mapped at
    pub base: u32,
    /// Flash size in bytes
    pub size: u32,
    /// Erase-page size in bytes
    pub page_size: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            base: 0x0800_0000,
            size: 64 * 1024,
            page_size: 2048,
        }
    }
}

impl MockConfig {
    /// The region descriptor matching this configuration
    pub fn region(&self) -> FlashRegion {
        FlashRegion::new(self.base, self.size, self.page_size)
    }
}

/// Mock flash controller
///
/// Emulates the flash controller and its mapped memory for testing
/// purposes. Starts in the locked, fully erased state.
#[cfg(feature = "alloc")]
pub struct MockController {
    config: MockConfig,
    data: Vec<u8>,
    locked: bool,
    fail_program_at: Option<u32>,
    fail_erase_at: Option<u32>,
    corrupt_verify_at: Option<u32>,
}

#[cfg(feature = "alloc")]
impl MockController {
    /// Create a new mock controller with the given configuration
    pub fn new(config: MockConfig) -> Self {
        let data = vec![ERASED_VALUE; config.size as usize];
        Self {
            config,
            data,
            locked: true,
            fail_program_at: None,
            fail_erase_at: None,
            corrupt_verify_at: None,
        }
    }

    /// Create a new mock controller with the default configuration
    pub fn new_default() -> Self {
        Self::new(MockConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Get a reference to the flash contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the flash contents
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Whether the controller protection is currently engaged
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Make the program command fail at `addr`
    pub fn fail_program_at(&mut self, addr: u32) {
        self.fail_program_at = Some(addr);
    }

    /// Make the page erase command fail for the page at `addr`
    pub fn fail_erase_at(&mut self, addr: u32) {
        self.fail_erase_at = Some(addr);
    }

    /// Corrupt the cell at `addr` after programming it, so read-back
    /// verification sees a different value
    pub fn corrupt_verify_at(&mut self, addr: u32) {
        self.corrupt_verify_at = Some(addr);
    }

    fn index(&self, addr: u32, len: usize) -> usize {
        let end = addr as u64 + len as u64;
        assert!(
            addr >= self.config.base && end <= self.config.base as u64 + self.config.size as u64,
            "mock access out of mapped range: 0x{:08X}+{}",
            addr,
            len
        );
        (addr - self.config.base) as usize
    }
}

#[cfg(feature = "alloc")]
impl FlashController for MockController {
    fn unlock(&mut self) {
        log::trace!("mock: unlock");
        self.locked = false;
    }

    fn lock(&mut self) {
        log::trace!("mock: lock");
        self.locked = true;
    }

    fn program_halfword(&mut self, addr: u32, value: u16) -> Result<()> {
        if self.locked {
            return Err(Error::ProgramFailed { addr });
        }
        if self.fail_program_at == Some(addr) {
            return Err(Error::ProgramFailed { addr });
        }

        let i = self.index(addr, 2);
        let bytes = value.to_le_bytes();
        // Flash programming: can only change 1 -> 0
        self.data[i] &= bytes[0];
        self.data[i + 1] &= bytes[1];

        if self.corrupt_verify_at == Some(addr) {
            self.data[i] ^= 0x01;
        }
        Ok(())
    }

    fn erase_page(&mut self, addr: u32) -> Result<()> {
        assert!(
            addr % self.config.page_size == 0,
            "mock erase of unaligned page address 0x{:08X}",
            addr
        );
        if self.locked {
            return Err(Error::EraseFailed { addr });
        }
        if self.fail_erase_at == Some(addr) {
            return Err(Error::EraseFailed { addr });
        }

        let i = self.index(addr, self.config.page_size as usize);
        for byte in &mut self.data[i..i + self.config.page_size as usize] {
            *byte = ERASED_VALUE;
        }
        Ok(())
    }

    fn read(&self, addr: u32, buf: &mut [u8]) {
        let i = self.index(addr, buf.len());
        buf.copy_from_slice(&self.data[i..i + buf.len()]);
    }
}
