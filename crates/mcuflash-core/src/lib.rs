//! mcuflash-core - On-chip flash access engine
//!
//! This crate provides bounds-safe access to the memory-mapped on-chip
//! flash of a microcontroller: byte-granular reads, halfword-granular
//! programmed writes with read-back verification, and page-granular
//! erasure. It is designed to be `no_std` compatible for use on the
//! target itself; the hardware is reached through the
//! [`FlashController`] trait so the engine can also run against an
//! in-memory emulation on the host.
//!
//! # Features
//!
//! - `std` - Enable standard library support (`std::error::Error` impl)
//! - `serde` - Serde derives on the region descriptor
//!
//! # Example
//!
//! ```ignore
//! use mcuflash_core::{FlashDriver, FlashRegion};
//!
//! let region = FlashRegion::onchip(64 * 1024);
//! let mut driver = FlashDriver::new(region, controller);
//!
//! let erased = driver.erase(region.base(), 100)?;
//! driver.write(region.base(), &[0xAA, 0xBB, 0xCC, 0xDD])?;
//! let mut buf = [0u8; 4];
//! driver.read(region.base(), &mut buf)?;
//! ```
//!
//! # Concurrency
//!
//! The flash controller is a single shared peripheral and the driver
//! performs no locking of its own. Callers must serialize write and
//! erase calls behind one mutual exclusion lock; reads may run
//! concurrently with each other but not with an in-flight write or
//! erase to overlapping addresses.

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod controller;
pub mod device;
pub mod driver;
pub mod error;
pub mod region;

pub use controller::{FlashController, UnlockGuard};
pub use device::{OnChipFlash, PartitionDevice, ONCHIP_DEVICE_NAME};
pub use driver::FlashDriver;
pub use error::{Error, Result};
pub use region::FlashRegion;
