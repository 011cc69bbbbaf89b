//! File-backed device image for host-side tooling.

use crate::device::BlockDevice;
use crate::error::{DeviceError, DeviceResult};
use crate::memory::ERASED_BYTE;
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A fixed-capacity file image of a device.
///
/// Unlike a growable data file, an EEPROM image has a capacity fixed at
/// creation: [`Self::create`] writes a fully erased image of the requested
/// size, and [`Self::open`] takes the existing file length as the capacity.
///
/// Writes are flushed to the OS before returning so that a read-back
/// observes what actually reached the file.
///
/// # Example
///
/// ```no_run
/// use nvcfg_device::{BlockDevice, FileDevice};
/// use std::path::Path;
///
/// let mut device = FileDevice::create(Path::new("node.eeprom"), 1024).unwrap();
/// device.write_block(0, &[0x42]).unwrap();
/// ```
#[derive(Debug)]
pub struct FileDevice {
    path: PathBuf,
    file: RwLock<File>,
    capacity: u32,
}

impl FileDevice {
    /// Creates a new erased image of `capacity` bytes at `path`.
    ///
    /// An existing file at the path is truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn create(path: &Path, capacity: u32) -> DeviceResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        file.write_all(&vec![ERASED_BYTE; capacity as usize])?;
        file.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            capacity,
        })
    }

    /// Opens an existing image; its file length becomes the capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its length exceeds
    /// the 32-bit device address space.
    pub fn open(path: &Path) -> DeviceResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();

        let capacity = u32::try_from(len).map_err(|_| {
            DeviceError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("image {} is too large for a device: {} bytes", path.display(), len),
            ))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            capacity,
        })
    }

    /// Returns the path to the underlying image file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockDevice for FileDevice {
    fn read_block(&self, addr: u32, len: usize) -> DeviceResult<Vec<u8>> {
        let end = (addr as usize).saturating_add(len);
        if end > self.capacity as usize {
            return Err(DeviceError::OutOfBounds {
                addr,
                len,
                capacity: self.capacity,
            });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(u64::from(addr)))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn write_block(&mut self, addr: u32, bytes: &[u8]) -> DeviceResult<()> {
        let end = (addr as usize).saturating_add(bytes.len());
        if end > self.capacity as usize {
            return Err(DeviceError::OutOfBounds {
                addr,
                len: bytes.len(),
                capacity: self.capacity,
            });
        }

        if bytes.is_empty() {
            return Ok(());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(u64::from(addr)))?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(())
    }

    fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_image(capacity: u32) -> (TempDir, FileDevice) {
        let dir = TempDir::new().unwrap();
        let device = FileDevice::create(&dir.path().join("node.eeprom"), capacity).unwrap();
        (dir, device)
    }

    #[test]
    fn file_create_is_erased() {
        let (_dir, device) = temp_image(64);
        assert_eq!(device.capacity(), 64);
        assert_eq!(device.read_block(0, 64).unwrap(), [ERASED_BYTE; 64]);
    }

    #[test]
    fn file_write_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.eeprom");

        let mut device = FileDevice::create(&path, 32).unwrap();
        device.write_block(8, b"persist").unwrap();
        drop(device);

        let device = FileDevice::open(&path).unwrap();
        assert_eq!(device.capacity(), 32);
        assert_eq!(device.read_block(8, 7).unwrap(), b"persist");
    }

    #[test]
    fn file_out_of_bounds_fails() {
        let (_dir, mut device) = temp_image(16);
        assert!(matches!(
            device.read_block(12, 8),
            Err(DeviceError::OutOfBounds { .. })
        ));
        assert!(matches!(
            device.write_block(16, &[0]),
            Err(DeviceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn file_open_missing_fails() {
        let dir = TempDir::new().unwrap();
        assert!(FileDevice::open(&dir.path().join("absent.eeprom")).is_err());
    }
}
