//! Error types for mcuflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Requested range extends beyond the flash region
    OutOfRange {
        /// Requested start address
        addr: u32,
        /// Requested length in bytes
        len: usize,
        /// End address of the region (exclusive)
        end: u32,
    },
    /// Address or length violates the halfword write granularity
    Unaligned {
        /// Requested start address
        addr: u32,
        /// Requested length in bytes
        len: usize,
    },
    /// Hardware reported a failed program command
    ProgramFailed {
        /// Address of the halfword that failed to program
        addr: u32,
    },
    /// A programmed halfword read back with a different value
    VerifyMismatch {
        /// Address of the mismatching halfword
        addr: u32,
        /// Value that was programmed
        wrote: u16,
        /// Value that was read back
        read: u16,
    },
    /// Hardware reported a failed page erase command
    EraseFailed {
        /// Start address of the page that failed to erase
        addr: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { addr, len, end } => {
                write!(
                    f,
                    "range 0x{:08X}+{} extends past region end 0x{:08X}",
                    addr, len, end
                )
            }
            Self::Unaligned { addr, len } => {
                write!(
                    f,
                    "address 0x{:08X} and length {} must both be halfword aligned",
                    addr, len
                )
            }
            Self::ProgramFailed { addr } => {
                write!(f, "program command failed at address 0x{:08X}", addr)
            }
            Self::VerifyMismatch { addr, wrote, read } => {
                write!(
                    f,
                    "verify failed at 0x{:08X}: wrote 0x{:04X}, read 0x{:04X}",
                    addr, wrote, read
                )
            }
            Self::EraseFailed { addr } => {
                write!(f, "erase command failed for page at 0x{:08X}", addr)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_addresses() {
        let e = Error::VerifyMismatch {
            addr: 0x0800_0004,
            wrote: 0xBBAA,
            read: 0xBBAB,
        };
        let mut buf = [0u8; 128];
        let mut writer = TestWriter { buf: &mut buf, pos: 0 };
        core::fmt::write(&mut writer, format_args!("{}", e)).unwrap();
        let s = core::str::from_utf8(&writer.buf[..writer.pos]).unwrap();
        assert!(s.contains("0x08000004"));
        assert!(s.contains("0xBBAA"));
    }

    struct TestWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl fmt::Write for TestWriter<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let bytes = s.as_bytes();
            self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
            self.pos += bytes.len();
            Ok(())
        }
    }
}
