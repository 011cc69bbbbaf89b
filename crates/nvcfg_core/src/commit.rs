//! Commit writer: crash-safe persistence of a single logical write.
//!
//! A commit writes in a fixed order - section data, backup, block-CRC8
//! tables, CRC16 triple - so that power loss at any byte boundary leaves
//! the device either fully valid or detectably invalid. The CRC16 triple is
//! written last and is the commit point: until it lands, reads validate
//! against the *old* CRC16 and report a mismatch instead of returning a
//! torn mixture of old and new bytes.
//!
//! Every write is read back and compared; a mismatch aborts the commit
//! without retry. The one accepted hole in the fault model: power lost
//! during the very first write (the section data itself) before its
//! read-back can leave primary bytes indeterminate while backup and CRC16
//! still describe the previous commit, in which case the next read returns
//! the old, pre-write state - a lost last write, not corruption.

use crate::error::{StoreError, StoreResult};
use crate::layout::{CONFIG_MAX_LEN, PASSWORD_LEN};
use crate::store::{ConfigStore, Section};
use nvcfg_device::BlockDevice;
use tracing::debug;

impl<D: BlockDevice> ConfigStore<D> {
    /// Persists a new password hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteVerify`] if any write fails its
    /// read-back, or a device error. Previously committed state remains
    /// authoritative on failure.
    pub fn write_password(&mut self, hash: &[u8; PASSWORD_LEN]) -> StoreResult<()> {
        self.commit(Section::Password, hash)
    }

    /// Persists a new config string. The terminator is appended here;
    /// `text` must not contain one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConfigTooLarge`] or [`StoreError::EmbeddedNul`]
    /// before anything is written, [`StoreError::WriteVerify`] if a write
    /// fails its read-back, or a device error.
    pub fn save_config(&mut self, text: &str) -> StoreResult<()> {
        if text.len() + 1 > CONFIG_MAX_LEN {
            return Err(StoreError::ConfigTooLarge {
                len: text.len(),
                max: CONFIG_MAX_LEN - 1,
            });
        }
        if text.bytes().any(|b| b == 0) {
            return Err(StoreError::EmbeddedNul);
        }

        let mut stored = Vec::with_capacity(text.len() + 1);
        stored.extend_from_slice(text.as_bytes());
        stored.push(0);
        self.commit(Section::Config, &stored)
    }

    /// Commits `bytes` to `section` with the full integrity protocol.
    fn commit(&mut self, section: Section, bytes: &[u8]) -> StoreResult<()> {
        let geometry = self.geometry();

        // Derive the post-write total size. When the password is written on
        // a device that never held a config, stamp the empty-config marker
        // first so the layout is defined from here on.
        let config_stored_len = match section {
            Section::Config => bytes.len(),
            Section::Password => match self.scan_config_len()? {
                Some(len) => len,
                None => {
                    self.verified_write(geometry.config_addr(), &[0])?;
                    1
                }
            },
        };
        let total_size = PASSWORD_LEN + config_stored_len;
        self.check_total_size(total_size)?;

        // One streaming pass over old+new bytes: region CRC16 and the
        // block-CRC8 table together, before anything is modified.
        let region_offset = section.region_offset();
        let (crc, block_table) = self.region_pass(total_size, Some((region_offset, bytes)))?;

        // (a) Section data to its primary address.
        self.verified_write(geometry.region_addr(region_offset), bytes)?;

        // (b) Backup: the region prefix that fits, password first. The
        // primary range is verified at this point, so it is the source.
        let backup_size = geometry.backup_size(total_size);
        if backup_size > 0 {
            let snapshot = self.read_region(0, backup_size)?;
            self.verified_write(geometry.backup_addr(total_size), &snapshot)?;
        }

        // (c) Block-CRC8 table and mirror, back to back.
        let mut tables = Vec::with_capacity(block_table.len() * 2);
        tables.extend_from_slice(&block_table);
        tables.extend_from_slice(&block_table);
        self.verified_write(geometry.block_table_addr(total_size), &tables)?;

        // (d) CRC16 triple last: the commit point.
        let mut crc_area = [0u8; 6];
        for copy in 0..3 {
            crc_area[copy * 2..copy * 2 + 2].copy_from_slice(&crc.to_le_bytes());
        }
        self.verified_write(geometry.crc16_addr(), &crc_area)?;

        debug!(
            section = ?section,
            total_size,
            crc = format_args!("{crc:#06x}"),
            backup_size,
            "commit complete"
        );
        Ok(())
    }
}
