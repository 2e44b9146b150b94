//! Flash region description and bounds checking
//!
//! A [`FlashRegion`] is the static description of the on-chip flash range:
//! base address, end address and erase-page size. It is fixed at
//! construction and consulted by every operation before hardware is touched.

use crate::error::{Error, Result};

/// Base address where the on-chip flash of this family is mapped
pub const ONCHIP_FLASH_BASE: u32 = 0x0800_0000;

/// Erase-page size used by parts with less than 256 KiB of flash
pub const SMALL_PART_PAGE_SIZE: u32 = 1024;

/// Erase-page size used by parts with 256 KiB of flash or more
pub const LARGE_PART_PAGE_SIZE: u32 = 2048;

/// Select the erase-page size for a part from its total flash size
pub const fn page_size_for(total_size: u32) -> u32 {
    if total_size < 256 * 1024 {
        SMALL_PART_PAGE_SIZE
    } else {
        LARGE_PART_PAGE_SIZE
    }
}

/// Static description of an on-chip flash region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashRegion {
    base: u32,
    end: u32,
    page_size: u32,
}

impl FlashRegion {
    /// Create a region from its base address, total size and page size
    ///
    /// # Panics
    ///
    /// Panics if the size is zero or not a whole number of pages, the
    /// page size is not a power of two, the base is not page aligned,
    /// or the region wraps the address space.
    pub const fn new(base: u32, size: u32, page_size: u32) -> Self {
        assert!(size > 0, "flash region must not be empty");
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        assert!(base % page_size == 0, "region base must be page aligned");
        assert!(size % page_size == 0, "region size must be a whole number of pages");
        assert!(
            base.checked_add(size).is_some(),
            "flash region wraps the address space"
        );
        Self {
            base,
            end: base + size,
            page_size,
        }
    }

    /// Create a region at the stock base address, picking the page size
    /// from the total flash size
    pub const fn onchip(size: u32) -> Self {
        Self::new(ONCHIP_FLASH_BASE, size, page_size_for(size))
    }

    /// First valid address of the region
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// End address of the region (exclusive)
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Total size of the region in bytes
    pub const fn size(&self) -> u32 {
        self.end - self.base
    }

    /// Erase-page size in bytes
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Start address of the erase-page containing `addr`
    pub const fn page_start(&self, addr: u32) -> u32 {
        addr & !(self.page_size - 1)
    }

    /// Check that `addr..addr + len` lies fully inside the region
    ///
    /// Pure bounds check, no side effects. Every operation calls this
    /// before touching hardware and aborts on failure.
    pub fn validate(&self, addr: u32, len: usize) -> Result<()> {
        let end = (addr as u64).saturating_add(len as u64);
        if addr < self.base || end > self.end as u64 {
            return Err(Error::OutOfRange {
                addr,
                len,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_full_region() {
        let region = FlashRegion::new(0x0800_0000, 0x1_0000, 2048);
        assert!(region.validate(0x0800_0000, 0x1_0000).is_ok());
        assert!(region.validate(0x0800_FFFF, 1).is_ok());
        assert!(region.validate(0x0800_0000, 0).is_ok());
    }

    #[test]
    fn test_validate_rejects_past_end() {
        let region = FlashRegion::new(0x0800_0000, 0x1_0000, 2048);
        let err = region.validate(0x0800_FFFE, 4).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { addr: 0x0800_FFFE, len: 4, .. }));
        assert!(region.validate(0x0801_0000, 1).is_err());
    }

    #[test]
    fn test_validate_rejects_below_base() {
        let region = FlashRegion::new(0x0800_0000, 0x1_0000, 2048);
        assert!(region.validate(0x07FF_FFFC, 8).is_err());
    }

    #[test]
    fn test_validate_does_not_wrap() {
        let region = FlashRegion::new(0x0800_0000, 0x1_0000, 2048);
        assert!(region.validate(0xFFFF_FFFE, 4).is_err());
        assert!(region.validate(0x0800_0000, usize::MAX).is_err());
    }

    #[test]
    fn test_page_start_aligns_down() {
        let region = FlashRegion::new(0x0800_0000, 0x1_0000, 2048);
        assert_eq!(region.page_start(0x0800_0000), 0x0800_0000);
        assert_eq!(region.page_start(0x0800_0064), 0x0800_0000);
        assert_eq!(region.page_start(0x0800_0800), 0x0800_0800);
        assert_eq!(region.page_start(0x0800_0801), 0x0800_0800);
    }

    #[test]
    fn test_page_size_selection() {
        assert_eq!(page_size_for(128 * 1024), SMALL_PART_PAGE_SIZE);
        assert_eq!(page_size_for(256 * 1024), LARGE_PART_PAGE_SIZE);
        assert_eq!(page_size_for(512 * 1024), LARGE_PART_PAGE_SIZE);
    }

    #[test]
    fn test_onchip_constructor() {
        let region = FlashRegion::onchip(64 * 1024);
        assert_eq!(region.base(), ONCHIP_FLASH_BASE);
        assert_eq!(region.size(), 64 * 1024);
        assert_eq!(region.page_size(), SMALL_PART_PAGE_SIZE);
    }
}
