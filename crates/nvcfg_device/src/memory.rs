//! In-memory device for testing.

use crate::device::BlockDevice;
use crate::error::{DeviceError, DeviceResult};
use parking_lot::RwLock;

/// The value of a never-written byte, matching the erase state of
/// NOR flash and most EEPROM parts.
pub const ERASED_BYTE: u8 = 0xFF;

/// An in-memory block device.
///
/// This device holds a fixed-capacity byte image in memory and is suitable
/// for:
/// - Unit tests
/// - Recovery and fault-injection scenarios (see [`Self::corrupt`])
///
/// A fresh device reads as all [`ERASED_BYTE`], like an erased part.
///
/// # Example
///
/// ```rust
/// use nvcfg_device::{BlockDevice, MemoryDevice, ERASED_BYTE};
///
/// let mut device = MemoryDevice::new(64);
/// assert_eq!(device.read_block(0, 1).unwrap(), [ERASED_BYTE]);
/// device.write_block(0, &[0xAA]).unwrap();
/// assert_eq!(device.read_block(0, 1).unwrap(), [0xAA]);
/// ```
#[derive(Debug)]
pub struct MemoryDevice {
    data: RwLock<Vec<u8>>,
}

impl MemoryDevice {
    /// Creates an erased device of the given capacity.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            data: RwLock::new(vec![ERASED_BYTE; capacity as usize]),
        }
    }

    /// Creates a device from a pre-existing byte image.
    ///
    /// Useful for reopening the post-crash image captured from another
    /// device in recovery tests.
    #[must_use]
    pub fn with_image(image: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(image),
        }
    }

    /// Returns a copy of the full device image.
    #[must_use]
    pub fn image(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// XORs the byte at `addr` with `mask`, simulating bit rot.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is outside the device. Test helper only.
    pub fn corrupt(&mut self, addr: u32, mask: u8) {
        self.data.write()[addr as usize] ^= mask;
    }
}

impl BlockDevice for MemoryDevice {
    fn read_block(&self, addr: u32, len: usize) -> DeviceResult<Vec<u8>> {
        let data = self.data.read();
        let start = addr as usize;
        let end = start.saturating_add(len);

        if end > data.len() {
            return Err(DeviceError::OutOfBounds {
                addr,
                len,
                capacity: data.len() as u32,
            });
        }

        Ok(data[start..end].to_vec())
    }

    fn write_block(&mut self, addr: u32, bytes: &[u8]) -> DeviceResult<()> {
        let mut data = self.data.write();
        let start = addr as usize;
        let end = start.saturating_add(bytes.len());

        if end > data.len() {
            return Err(DeviceError::OutOfBounds {
                addr,
                len: bytes.len(),
                capacity: data.len() as u32,
            });
        }

        data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    fn capacity(&self) -> u32 {
        self.data.read().len() as u32
    }
}
