//! Partition-facing device adapter
//!
//! A [`PartitionDevice`] is what an external flash-partition manager
//! sees: a named region with offset-relative read/write/erase entry
//! points plus the geometry it needs to lay out partitions. The on-chip
//! engine has exactly one implementer, [`OnChipFlash`], which adds the
//! region base to the partition-relative offset and forwards to the
//! driver. No validation happens here beyond what the driver already
//! performs.

use crate::controller::FlashController;
use crate::driver::FlashDriver;
use crate::error::{Error, Result};

/// Device name the on-chip flash registers under
pub const ONCHIP_DEVICE_NAME: &str = "onchip_flash";

/// A named flash device with offset-relative operations
///
/// Offsets are relative to the device base; `offset + len` must stay
/// inside the device. The erase granularity caveat of
/// [`FlashDriver::erase`] applies unchanged: the erased range is
/// widened to whole pages.
pub trait PartitionDevice {
    /// Name the device is registered under
    fn name(&self) -> &str;

    /// Absolute address the device starts at
    fn base_address(&self) -> u32;

    /// Total size of the device in bytes
    fn total_size(&self) -> u32;

    /// Erase-page size in bytes
    fn page_size(&self) -> u32;

    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize>;

    /// Program `data` starting at `offset` (halfword granularity)
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<usize>;

    /// Erase every page overlapping `offset..offset + len`
    fn erase(&mut self, offset: u32, len: usize) -> Result<usize>;
}

/// The on-chip flash region published as a partition device
pub struct OnChipFlash<C> {
    driver: FlashDriver<C>,
    name: &'static str,
}

impl<C: FlashController> OnChipFlash<C> {
    /// Wrap a driver under the stock device name
    pub fn new(driver: FlashDriver<C>) -> Self {
        Self::with_name(driver, ONCHIP_DEVICE_NAME)
    }

    /// Wrap a driver under a custom device name
    pub fn with_name(driver: FlashDriver<C>, name: &'static str) -> Self {
        Self { driver, name }
    }

    /// Borrow the wrapped driver
    pub fn driver(&self) -> &FlashDriver<C> {
        &self.driver
    }

    /// Mutably borrow the wrapped driver
    pub fn driver_mut(&mut self) -> &mut FlashDriver<C> {
        &mut self.driver
    }

    fn absolute(&self, offset: u32, len: usize) -> Result<u32> {
        let region = self.driver.region();
        region.base().checked_add(offset).ok_or(Error::OutOfRange {
            addr: offset,
            len,
            end: region.end(),
        })
    }
}

impl<C: FlashController> PartitionDevice for OnChipFlash<C> {
    fn name(&self) -> &str {
        self.name
    }

    fn base_address(&self) -> u32 {
        self.driver.region().base()
    }

    fn total_size(&self) -> u32 {
        self.driver.region().size()
    }

    fn page_size(&self) -> u32 {
        self.driver.region().page_size()
    }

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize> {
        let addr = self.absolute(offset, buf.len())?;
        self.driver.read(addr, buf)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<usize> {
        let addr = self.absolute(offset, data.len())?;
        self.driver.write(addr, data)
    }

    fn erase(&mut self, offset: u32, len: usize) -> Result<usize> {
        let addr = self.absolute(offset, len)?;
        self.driver.erase(addr, len)
    }
}
