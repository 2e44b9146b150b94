//! mcuflash-part - Named flash device registry
//!
//! This crate is the integration surface toward an external
//! flash-partition manager: flash devices implementing
//! [`PartitionDevice`](mcuflash_core::PartitionDevice) are registered
//! under their name and looked up by name for logical-partition I/O.
//! The partition-table format itself is owned by the manager; this
//! crate only provides the device side of the contract.

pub mod registry;

pub use registry::{DeviceInfo, DeviceRegistry, RegistryError};
