//! Recovery reader: validation, voting, self-heal, and backup restoration.
//!
//! Every read restarts from scratch: scan the terminator, vote the CRC16
//! triple, recompute both checksums in one pass, and only then hand bytes
//! out. Nothing is cached between calls, because the previous call may have
//! left the device freshly self-healed or still corrupt - that state must
//! be re-derived, never assumed.
//!
//! Self-healing (minority CRC16 repair, mirror-table repair, backup
//! restoration) is not an error. It is logged and otherwise observable only
//! in that the read succeeds.

use crate::error::{StoreError, StoreResult};
use crate::layout::{Geometry, BLOCK_SIZE, PASSWORD_LEN};
use crate::store::{ConfigStore, Section};
use nvcfg_device::BlockDevice;
use tracing::{debug, warn};

impl<D: BlockDevice> ConfigStore<D> {
    /// Reads the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ChecksumVote`] if the three CRC16 copies
    /// mutually disagree, or [`StoreError::Unrecoverable`] if corruption
    /// was detected and the backup cannot repair it. Never returns
    /// partially corrupted bytes.
    pub fn read_password(&mut self) -> StoreResult<[u8; PASSWORD_LEN]> {
        let bytes = self.read_section(Section::Password)?;
        let mut hash = [0u8; PASSWORD_LEN];
        hash.copy_from_slice(&bytes);
        Ok(hash)
    }

    /// Reads the stored config string, without its terminator.
    ///
    /// A device on which no config was ever committed yields the empty
    /// string.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::read_password`], plus
    /// [`StoreError::InvalidUtf8`] if the validated bytes do not decode.
    pub fn load_config(&mut self) -> StoreResult<String> {
        if self.scan_config_len()?.is_none() {
            return Ok(String::new());
        }

        let mut bytes = self.read_section(Section::Config)?;
        debug_assert_eq!(bytes.last(), Some(&0));
        bytes.pop();
        Ok(String::from_utf8(bytes)?)
    }

    /// Validates the store and reads one section.
    ///
    /// State machine: scan -> vote CRC16 -> validate -> fast return, or
    /// recover from backup -> repair and return, or fail.
    fn read_section(&mut self, section: Section) -> StoreResult<Vec<u8>> {
        let geometry = self.geometry();

        // Total size is always re-derived from the on-device terminator.
        let config_stored_len = self.scan_config_len()?.unwrap_or(0);
        let total_size = PASSWORD_LEN + config_stored_len;
        self.check_total_size(total_size)?;

        let authoritative_crc = self.vote_crc16()?;

        // Both block-table copies; disagreement is resolved after the
        // recomputation below.
        let num_blocks = Geometry::num_blocks(total_size);
        let mut stored_table = self.read_at(geometry.block_table_addr(total_size), num_blocks)?;
        let mirror_table = self.read_at(geometry.block_mirror_addr(total_size), num_blocks)?;

        // The same single pass the writer uses: region CRC16 and a fresh
        // block table together.
        let (computed_crc, computed_table) = self.region_pass(total_size, None)?;

        if stored_table != mirror_table {
            if stored_table == computed_table {
                warn!("block-CRC8 mirror corrupt; repairing from primary table");
                self.write_at(geometry.block_mirror_addr(total_size), &stored_table)?;
            } else if mirror_table == computed_table {
                warn!("block-CRC8 table corrupt; repairing from mirror");
                self.write_at(geometry.block_table_addr(total_size), &mirror_table)?;
                stored_table = mirror_table;
            }
            // Neither matches: both stay suspect; the CRC16 comparison
            // below is authoritative either way.
        }

        let section_len = match section {
            Section::Password => PASSWORD_LEN,
            Section::Config => config_stored_len,
        };

        if computed_crc == authoritative_crc {
            debug!(total_size, "region verified");
            return self.read_region(section.region_offset(), section_len);
        }

        warn!(
            expected = format_args!("{authoritative_crc:#06x}"),
            computed = format_args!("{computed_crc:#06x}"),
            "region CRC16 mismatch; attempting backup recovery"
        );
        self.restore_from_backup(total_size, authoritative_crc, &stored_table, &computed_table)?;
        self.read_region(section.region_offset(), section_len)
    }

    /// Majority vote over the three stored CRC16 copies, repairing a
    /// single dissenting copy in place.
    fn vote_crc16(&mut self) -> StoreResult<u16> {
        let area = self.read_at(self.geometry().crc16_addr(), 6)?;
        let a = u16::from_le_bytes([area[0], area[1]]);
        let b = u16::from_le_bytes([area[2], area[3]]);
        let c = u16::from_le_bytes([area[4], area[5]]);

        let crc_addr = self.geometry().crc16_addr();
        if a == b && b == c {
            return Ok(a);
        }
        if a == b {
            warn!(copy = 2, "CRC16 copy disagreed; repaired from majority");
            self.write_at(crc_addr + 4, &a.to_le_bytes())?;
            return Ok(a);
        }
        if a == c {
            warn!(copy = 1, "CRC16 copy disagreed; repaired from majority");
            self.write_at(crc_addr + 2, &a.to_le_bytes())?;
            return Ok(a);
        }
        if b == c {
            warn!(copy = 0, "CRC16 copy disagreed; repaired from majority");
            self.write_at(crc_addr, &b.to_le_bytes())?;
            return Ok(b);
        }
        Err(StoreError::ChecksumVote { a, b, c })
    }

    /// Attempts to repair the Logical Region from the Backup Region.
    ///
    /// The backup is trusted only if the region *reconstructed* from it
    /// (backup bytes for the covered prefix, stored bytes beyond) matches
    /// the voted CRC16; after copying it over primary storage the region is
    /// recomputed and checked once more.
    fn restore_from_backup(
        &mut self,
        total_size: usize,
        authoritative_crc: u16,
        stored_table: &[u8],
        computed_table: &[u8],
    ) -> StoreResult<()> {
        let geometry = self.geometry();
        let backup_size = geometry.backup_size(total_size);
        let covered_blocks = backup_size.div_ceil(BLOCK_SIZE);

        // Every disagreeing block must lie inside backup coverage;
        // otherwise the damage is in bytes the backup cannot restore.
        let all_covered = stored_table
            .iter()
            .zip(computed_table)
            .enumerate()
            .filter(|(_, (stored, computed))| stored != computed)
            .all(|(index, _)| index < covered_blocks);

        if backup_size == 0 || !all_covered {
            return Err(StoreError::unrecoverable(
                "corrupted blocks fall outside backup coverage",
            ));
        }

        // Reconstructed CRC16: backup prefix, then the stored remainder.
        let backup = self.read_at(geometry.backup_addr(total_size), backup_size)?;
        let mut reconstructed = crate::checksum::CRC16_INIT;
        for &byte in &backup {
            reconstructed = crate::checksum::crc16_update(reconstructed, byte);
        }
        if backup_size < total_size {
            let tail = self.read_region(backup_size, total_size - backup_size)?;
            for &byte in &tail {
                reconstructed = crate::checksum::crc16_update(reconstructed, byte);
            }
        }

        if reconstructed != authoritative_crc {
            return Err(StoreError::unrecoverable(
                "backup failed CRC16 verification",
            ));
        }

        warn!(backup_size, "restoring Logical Region from backup");
        self.write_at(geometry.region_addr(0), &backup)?;

        // Defense in depth: the repaired primary region must itself verify.
        let (recheck_crc, _) = self.region_pass(total_size, None)?;
        if recheck_crc != authoritative_crc {
            return Err(StoreError::unrecoverable(
                "repaired region failed CRC16 re-verification",
            ));
        }

        debug!("backup recovery succeeded");
        Ok(())
    }
}
