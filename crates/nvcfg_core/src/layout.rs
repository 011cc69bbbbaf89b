//! Layout calculator: pure address arithmetic over the device.
//!
//! Every on-device structure after the Config Section sits at an address
//! that depends on the current `total_size` (password plus stored config).
//! Those addresses are re-derived on every operation from the bytes
//! currently on the device - nothing is cached, so the layout can never go
//! stale relative to the data it describes. A config whose length changes
//! automatically relocates the checksum tables and resizes the backup
//! window on the next write.
//!
//! ```text
//! [CRC16 x3 (6)] [Password (32)] [Config (<=256, NUL-terminated)]
//! [CRC8 table (N)] [CRC8 mirror (N)] [Backup (whatever remains)]
//! ```

use crate::error::{StoreError, StoreResult};

/// Size in bytes of one checksummed block of the Logical Region.
pub const BLOCK_SIZE: usize = 32;

/// Exact size in bytes of the stored password hash.
pub const PASSWORD_LEN: usize = 32;

/// Maximum stored size of the Config Section, terminator included.
pub const CONFIG_MAX_LEN: usize = 256;

/// Number of stored copies of the whole-region CRC16.
pub const CRC16_COPIES: usize = 3;

/// Bytes occupied by the stored CRC16 copies.
const CRC16_AREA: u32 = (CRC16_COPIES * 2) as u32;

/// Placement of the store on a device.
///
/// The base address and device capacity are the only runtime parameters;
/// all block/section sizes are build-time constants because they are part
/// of the on-device format. Follows a builder style:
///
/// ```rust
/// use nvcfg_core::Geometry;
///
/// let geometry = Geometry::new().base(413).device_size(1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// First device address owned by the store.
    pub base: u32,
    /// Total device capacity in bytes (absolute, not relative to `base`).
    pub device_size: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            base: 0,
            device_size: 1024,
        }
    }
}

impl Geometry {
    /// Creates a geometry with default placement (base 0, 1024 bytes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base address.
    #[must_use]
    pub const fn base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    /// Sets the device capacity.
    #[must_use]
    pub const fn device_size(mut self, device_size: u32) -> Self {
        self.device_size = device_size;
        self
    }

    /// Address of the first CRC16 copy.
    #[must_use]
    pub const fn crc16_addr(&self) -> u32 {
        self.base
    }

    /// Address of the Password Section.
    #[must_use]
    pub const fn password_addr(&self) -> u32 {
        self.base + CRC16_AREA
    }

    /// Address of the Config Section. The config follows the password
    /// directly, so the Logical Region is one contiguous device range
    /// starting at [`Self::password_addr`].
    #[must_use]
    pub const fn config_addr(&self) -> u32 {
        self.password_addr() + PASSWORD_LEN as u32
    }

    /// Maps a Logical Region offset to its device address.
    #[must_use]
    pub const fn region_addr(&self, offset: usize) -> u32 {
        self.password_addr() + offset as u32
    }

    /// Number of CRC8 blocks covering a region of `total_size` bytes.
    #[must_use]
    pub const fn num_blocks(total_size: usize) -> usize {
        total_size.div_ceil(BLOCK_SIZE)
    }

    /// Address of the block-CRC8 table, immediately after the config.
    #[must_use]
    pub const fn block_table_addr(&self, total_size: usize) -> u32 {
        self.config_addr() + (total_size - PASSWORD_LEN) as u32
    }

    /// Address of the block-CRC8 mirror table.
    #[must_use]
    pub const fn block_mirror_addr(&self, total_size: usize) -> u32 {
        self.block_table_addr(total_size) + Self::num_blocks(total_size) as u32
    }

    /// Address of the Backup Region.
    #[must_use]
    pub const fn backup_addr(&self, total_size: usize) -> u32 {
        self.block_mirror_addr(total_size) + Self::num_blocks(total_size) as u32
    }

    /// Bytes available to the Backup Region between the mirror table and
    /// the end of the device.
    #[must_use]
    pub const fn backup_capacity(&self, total_size: usize) -> usize {
        let addr = self.backup_addr(total_size);
        if addr < self.device_size {
            (self.device_size - addr) as usize
        } else {
            0
        }
    }

    /// Bytes of the Logical Region the backup actually covers: the whole
    /// region if it fits, otherwise a prefix (password first, then as much
    /// config as there is room for), possibly zero.
    #[must_use]
    pub const fn backup_size(&self, total_size: usize) -> usize {
        let capacity = self.backup_capacity(total_size);
        if total_size < capacity {
            total_size
        } else {
            capacity
        }
    }

    /// Smallest device that can hold the fixed region at maximum config
    /// size: CRC16 copies, password, config, and both block tables. The
    /// backup may legally be empty.
    #[must_use]
    pub const fn min_device_size(&self) -> u32 {
        let max_total = PASSWORD_LEN + CONFIG_MAX_LEN;
        self.block_mirror_addr(max_total) + Self::num_blocks(max_total) as u32
    }

    /// Validates the geometry against a device capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidGeometry`] if the store does not fit
    /// the declared device size or the device is smaller than declared.
    pub fn validate(&self, device_capacity: u32) -> StoreResult<()> {
        if self.device_size > device_capacity {
            return Err(StoreError::invalid_geometry(format!(
                "geometry declares {} bytes but device has {}",
                self.device_size, device_capacity
            )));
        }
        if self.min_device_size() > self.device_size {
            return Err(StoreError::invalid_geometry(format!(
                "device size {} cannot hold the store (needs at least {})",
                self.device_size,
                self.min_device_size()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_addresses() {
        let geometry = Geometry::new().base(413);
        assert_eq!(geometry.crc16_addr(), 413);
        assert_eq!(geometry.password_addr(), 419);
        assert_eq!(geometry.config_addr(), 451);
        assert_eq!(geometry.region_addr(0), geometry.password_addr());
        assert_eq!(geometry.region_addr(PASSWORD_LEN), geometry.config_addr());
    }

    #[test]
    fn num_blocks_rounds_up() {
        assert_eq!(Geometry::num_blocks(1), 1);
        assert_eq!(Geometry::num_blocks(BLOCK_SIZE), 1);
        assert_eq!(Geometry::num_blocks(BLOCK_SIZE + 1), 2);
        assert_eq!(Geometry::num_blocks(33 + PASSWORD_LEN), 3);
    }

    #[test]
    fn tables_move_with_config_length() {
        let geometry = Geometry::new();

        // Empty config: one stored terminator byte
        let total = PASSWORD_LEN + 1;
        assert_eq!(geometry.block_table_addr(total), geometry.config_addr() + 1);
        assert_eq!(
            geometry.block_mirror_addr(total),
            geometry.block_table_addr(total) + 2
        );

        // Longer config pushes everything out
        let total = PASSWORD_LEN + 100;
        assert_eq!(
            geometry.block_table_addr(total),
            geometry.config_addr() + 100
        );
        let blocks = Geometry::num_blocks(total) as u32;
        assert_eq!(
            geometry.backup_addr(total),
            geometry.block_table_addr(total) + 2 * blocks
        );
    }

    #[test]
    fn backup_shrinks_to_zero_on_tiny_devices() {
        let total = PASSWORD_LEN + 241;
        let geometry = Geometry::new().device_size(400);
        // Partial coverage: less than the region, more than nothing
        let size = geometry.backup_size(total);
        assert!(size > 0 && size < total);

        // Smallest valid device, config at maximum size: no room at all
        let geometry = Geometry::new().device_size(312);
        assert!(geometry.validate(312).is_ok());
        let total = PASSWORD_LEN + CONFIG_MAX_LEN;
        assert_eq!(geometry.backup_capacity(total), 0);
        assert_eq!(geometry.backup_size(total), 0);
    }

    #[test]
    fn backup_covers_whole_region_when_it_fits() {
        let geometry = Geometry::new();
        let total = PASSWORD_LEN + 11;
        assert_eq!(geometry.backup_size(total), total);
    }

    #[test]
    fn validate_rejects_undersized_devices() {
        let geometry = Geometry::new();
        assert!(geometry.validate(1024).is_ok());
        assert!(geometry.validate(100).is_err());

        let geometry = Geometry::new().device_size(200);
        assert!(geometry.validate(1024).is_err());
    }
}
