//! Device registry keyed by device name
//!
//! A partition manager indexes flash devices by name; this registry
//! owns the registered devices and hands out mutable access for
//! logical-partition I/O.

use mcuflash_core::PartitionDevice;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A device with the same name is already registered
    #[error("flash device '{0}' is already registered")]
    DuplicateDevice(String),
    /// No device with the requested name is registered
    #[error("no flash device named '{0}' is registered")]
    DeviceNotFound(String),
}

/// Geometry summary of a registered device
///
/// This is the read-only entry a partition manager consumes when laying
/// out partitions: name, physical base, total size and erase-page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Name the device is registered under
    pub name: String,
    /// Absolute address the device starts at
    pub base_address: u32,
    /// Total size of the device in bytes
    pub total_size: u32,
    /// Erase-page size in bytes
    pub page_size: u32,
}

/// Registry of named flash devices
#[derive(Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, Box<dyn PartitionDevice>>,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device under its own name
    ///
    /// The entry is read-only after registration: name and geometry are
    /// fixed, only the I/O entry points are exercised afterwards.
    pub fn register(&mut self, device: Box<dyn PartitionDevice>) -> Result<(), RegistryError> {
        let name = device.name().to_string();
        if self.devices.contains_key(&name) {
            return Err(RegistryError::DuplicateDevice(name));
        }
        log::info!(
            "registered flash device '{}': base 0x{:08X}, {} bytes, {} byte pages",
            name,
            device.base_address(),
            device.total_size(),
            device.page_size()
        );
        self.devices.insert(name, device);
        Ok(())
    }

    /// Look up a device by name for I/O
    pub fn find(&mut self, name: &str) -> Result<&mut (dyn PartitionDevice + 'static), RegistryError> {
        self.devices
            .get_mut(name)
            .map(|d| d.as_mut())
            .ok_or_else(|| RegistryError::DeviceNotFound(name.to_string()))
    }

    /// Geometry of a device without borrowing it for I/O
    pub fn info(&self, name: &str) -> Result<DeviceInfo, RegistryError> {
        self.devices
            .get(name)
            .map(|d| DeviceInfo {
                name: d.name().to_string(),
                base_address: d.base_address(),
                total_size: d.total_size(),
                page_size: d.page_size(),
            })
            .ok_or_else(|| RegistryError::DeviceNotFound(name.to_string()))
    }

    /// Names of all registered devices, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.devices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcuflash_core::{FlashDriver, OnChipFlash, ONCHIP_DEVICE_NAME};
    use mcuflash_mock::{MockConfig, MockController};

    fn onchip_device() -> Box<dyn PartitionDevice> {
        let config = MockConfig::default();
        let driver = FlashDriver::new(config.region(), MockController::new(config));
        Box::new(OnChipFlash::new(driver))
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = DeviceRegistry::new();
        registry.register(onchip_device()).unwrap();
        assert_eq!(registry.len(), 1);

        let dev = registry.find(ONCHIP_DEVICE_NAME).unwrap();
        assert_eq!(dev.base_address(), 0x0800_0000);

        // Partition I/O through the registry, offset-relative
        dev.erase(0, 100).unwrap();
        dev.write(0, &[0x01, 0x02]).unwrap();
        let mut buf = [0u8; 2];
        dev.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = DeviceRegistry::new();
        registry.register(onchip_device()).unwrap();
        let err = registry.register(onchip_device()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateDevice(name) if name == ONCHIP_DEVICE_NAME));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_device() {
        let mut registry = DeviceRegistry::new();
        assert!(matches!(
            registry.find("nope"),
            Err(RegistryError::DeviceNotFound(_))
        ));
        assert!(registry.info("nope").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_info_and_names() {
        let mut registry = DeviceRegistry::new();
        registry.register(onchip_device()).unwrap();

        let config = MockConfig {
            base: 0x0810_0000,
            size: 128 * 1024,
            page_size: 1024,
        };
        let driver = FlashDriver::new(config.region(), MockController::new(config));
        registry
            .register(Box::new(OnChipFlash::with_name(driver, "bank1_flash")))
            .unwrap();

        assert_eq!(registry.names(), vec!["bank1_flash", ONCHIP_DEVICE_NAME]);
        let info = registry.info("bank1_flash").unwrap();
        assert_eq!(
            info,
            DeviceInfo {
                name: "bank1_flash".to_string(),
                base_address: 0x0810_0000,
                total_size: 128 * 1024,
                page_size: 1024,
            }
        );
    }
}
