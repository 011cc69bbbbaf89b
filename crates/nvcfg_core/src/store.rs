//! Store facade and the machinery shared by the commit and recovery paths.

use crate::checksum::{crc16_update, crc8, CRC16_INIT};
use crate::error::{StoreError, StoreResult};
use crate::layout::{Geometry, BLOCK_SIZE, CONFIG_MAX_LEN, PASSWORD_LEN};
use nvcfg_device::BlockDevice;

/// Which section of the Logical Region an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    /// The fixed-size password hash at region offset 0.
    Password,
    /// The NUL-terminated config string following the password.
    Config,
}

impl Section {
    /// Offset of the section within the Logical Region.
    pub(crate) fn region_offset(self) -> usize {
        match self {
            Self::Password => 0,
            Self::Config => PASSWORD_LEN,
        }
    }
}

/// The durable configuration store.
///
/// Owns the injected device capability and persists two things: a
/// fixed-size password hash and a variable-length config string, protected
/// by a triple-redundant whole-region CRC16, a mirrored per-block CRC8
/// table, and a best-effort backup copy of the region (see the crate docs
/// for the on-device layout).
///
/// One instance per device; construct it once at startup and pass it by
/// reference. Every operation takes `&mut self` - reads too, because a read
/// may self-heal the device - which also enforces the required
/// serialization of operations at compile time.
///
/// # Example
///
/// ```rust
/// use nvcfg_core::{ConfigStore, Geometry};
/// use nvcfg_device::MemoryDevice;
///
/// let device = MemoryDevice::new(1024);
/// let mut store = ConfigStore::new(device, Geometry::default()).unwrap();
///
/// store.write_password(&[0x42; 32]).unwrap();
/// store.save_config("relay_a=on").unwrap();
/// assert_eq!(store.load_config().unwrap(), "relay_a=on");
/// ```
#[derive(Debug)]
pub struct ConfigStore<D: BlockDevice> {
    device: D,
    geometry: Geometry,
}

impl<D: BlockDevice> ConfigStore<D> {
    /// Creates a store over `device` with the given placement.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidGeometry`] if the store does not fit
    /// the device.
    pub fn new(device: D, geometry: Geometry) -> StoreResult<Self> {
        geometry.validate(device.capacity())?;
        Ok(Self { device, geometry })
    }

    /// Returns the store's placement on the device.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Consumes the store and returns the device.
    pub fn into_device(self) -> D {
        self.device
    }

    /// Returns the data length of the stored config in bytes, excluding
    /// the terminator; 0 if no config has ever been saved.
    ///
    /// This is a terminator scan only - integrity is checked by the read
    /// operations, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be read.
    pub fn get_config_size(&mut self) -> StoreResult<u16> {
        let stored = self.scan_config_len()?;
        Ok(stored.map_or(0, |n| (n - 1) as u16))
    }

    /// Scans the Config Section for its terminator in `BLOCK_SIZE` chunks.
    ///
    /// Returns the stored length *including* the terminator, or `None` if
    /// no terminator exists within `CONFIG_MAX_LEN` bytes (a device on
    /// which no config was ever committed).
    pub(crate) fn scan_config_len(&self) -> StoreResult<Option<usize>> {
        let config_addr = self.geometry.config_addr();

        let mut offset = 0;
        while offset < CONFIG_MAX_LEN {
            let chunk = BLOCK_SIZE.min(CONFIG_MAX_LEN - offset);
            let block = self.device.read_block(config_addr + offset as u32, chunk)?;
            if let Some(pos) = block.iter().position(|&b| b == 0) {
                return Ok(Some(offset + pos + 1));
            }
            offset += chunk;
        }
        Ok(None)
    }

    /// Single streaming pass over the Logical Region computing the
    /// whole-region CRC16 and the per-block CRC8 table together.
    ///
    /// `patch` substitutes new bytes at a region offset without touching
    /// the device, so the commit path can checksum the post-write region
    /// before writing a single byte. The recovery path passes `None` and
    /// checksums what is actually stored.
    pub(crate) fn region_pass(
        &self,
        total_size: usize,
        patch: Option<(usize, &[u8])>,
    ) -> StoreResult<(u16, Vec<u8>)> {
        let mut crc = CRC16_INIT;
        let mut table = Vec::with_capacity(Geometry::num_blocks(total_size));

        let mut offset = 0;
        while offset < total_size {
            let chunk = BLOCK_SIZE.min(total_size - offset);
            let mut block = self
                .device
                .read_block(self.geometry.region_addr(offset), chunk)?;

            if let Some((patch_offset, bytes)) = patch {
                for (i, slot) in block.iter_mut().enumerate() {
                    let region_pos = offset + i;
                    if region_pos >= patch_offset && region_pos < patch_offset + bytes.len() {
                        *slot = bytes[region_pos - patch_offset];
                    }
                }
            }

            table.push(crc8(&block));
            for &byte in &block {
                crc = crc16_update(crc, byte);
            }
            offset += chunk;
        }

        Ok((crc, table))
    }

    /// Reads `len` bytes of the Logical Region starting at `offset`.
    pub(crate) fn read_region(&self, offset: usize, len: usize) -> StoreResult<Vec<u8>> {
        Ok(self.device.read_block(self.geometry.region_addr(offset), len)?)
    }

    /// Raw device read, bounds-checked by the device.
    pub(crate) fn read_at(&self, addr: u32, len: usize) -> StoreResult<Vec<u8>> {
        Ok(self.device.read_block(addr, len)?)
    }

    /// Raw device write without read-back verification.
    ///
    /// Used for self-heal repairs on the read path, where the authoritative
    /// validation that follows covers the repair anyway.
    pub(crate) fn write_at(&mut self, addr: u32, bytes: &[u8]) -> StoreResult<()> {
        Ok(self.device.write_block(addr, bytes)?)
    }

    /// Writes `bytes` at `addr` and verifies them by reading back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteVerify`] if the read-back differs. The
    /// write is not retried; retry policy belongs to the caller.
    pub(crate) fn verified_write(&mut self, addr: u32, bytes: &[u8]) -> StoreResult<()> {
        self.device.write_block(addr, bytes)?;
        let readback = self.device.read_block(addr, bytes.len())?;
        if readback != bytes {
            return Err(StoreError::WriteVerify {
                addr,
                len: bytes.len(),
            });
        }
        Ok(())
    }

    /// Bounds check on a freshly derived total size.
    pub(crate) fn check_total_size(&self, total_size: usize) -> StoreResult<()> {
        let max = PASSWORD_LEN + CONFIG_MAX_LEN;
        if total_size > max {
            return Err(StoreError::OutOfRange { total_size, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CONFIG_MAX_LEN;
    use nvcfg_device::MemoryDevice;

    fn fresh_store() -> ConfigStore<MemoryDevice> {
        ConfigStore::new(MemoryDevice::new(1024), Geometry::default()).unwrap()
    }

    #[test]
    fn new_rejects_undersized_device() {
        let result = ConfigStore::new(MemoryDevice::new(64), Geometry::default());
        assert!(matches!(result, Err(StoreError::InvalidGeometry { .. })));

        let result = ConfigStore::new(
            MemoryDevice::new(64),
            Geometry::new().device_size(64),
        );
        assert!(matches!(result, Err(StoreError::InvalidGeometry { .. })));
    }

    #[test]
    fn fresh_device_has_no_config() {
        let mut store = fresh_store();
        assert_eq!(store.scan_config_len().unwrap(), None);
        assert_eq!(store.get_config_size().unwrap(), 0);
    }

    #[test]
    fn scan_finds_terminator_across_chunks() {
        let mut store = fresh_store();
        let addr = store.geometry().config_addr();
        // Terminator in the second scan chunk
        store.write_at(addr, &[b'x'; 40]).unwrap();
        store.write_at(addr + 40, &[0]).unwrap();

        assert_eq!(store.scan_config_len().unwrap(), Some(41));
        assert_eq!(store.get_config_size().unwrap(), 40);
    }

    #[test]
    fn scan_ignores_bytes_past_config_max() {
        let mut store = fresh_store();
        let addr = store.geometry().config_addr();
        // Only a terminator beyond the config area; scan must not see it
        store
            .write_at(addr + CONFIG_MAX_LEN as u32, &[0])
            .unwrap();
        assert_eq!(store.scan_config_len().unwrap(), None);
    }

    #[test]
    fn region_pass_patch_substitutes_without_writing() {
        let store = fresh_store();
        let patch = [0xAAu8; 8];

        let (patched_crc, _) = store.region_pass(48, Some((4, &patch[..]))).unwrap();
        let (stored_crc, _) = store.region_pass(48, None).unwrap();
        assert_ne!(patched_crc, stored_crc);

        // Device untouched by the patched pass
        assert_eq!(store.read_region(4, 8).unwrap(), [0xFF; 8]);
    }

    #[test]
    fn region_pass_block_table_length() {
        let store = fresh_store();
        let (_, table) = store.region_pass(33, None).unwrap();
        assert_eq!(table.len(), 2);
        let (_, table) = store.region_pass(64, None).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn verified_write_round_trips() {
        let mut store = fresh_store();
        store.verified_write(100, b"verified").unwrap();
        assert_eq!(store.read_at(100, 8).unwrap(), b"verified");
    }
}
