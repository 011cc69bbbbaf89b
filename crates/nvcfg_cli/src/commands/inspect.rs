//! Inspect command implementation.

use nvcfg_core::{Geometry, BLOCK_SIZE, CONFIG_MAX_LEN, PASSWORD_LEN};
use serde::Serialize;
use std::path::Path;

/// Derived layout and state of a store image.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Device capacity in bytes.
    pub device_size: u32,
    /// Data length of the stored config (excluding terminator).
    pub config_data_len: u16,
    /// Current Logical Region size in bytes.
    pub total_size: usize,
    /// Number of CRC8 blocks covering the region.
    pub num_blocks: usize,
    /// Address of the CRC16 triple.
    pub crc16_addr: u32,
    /// Address of the Password Section.
    pub password_addr: u32,
    /// Address of the Config Section.
    pub config_addr: u32,
    /// Address of the block-CRC8 table.
    pub block_table_addr: u32,
    /// Address of the block-CRC8 mirror.
    pub block_mirror_addr: u32,
    /// Address of the Backup Region.
    pub backup_addr: u32,
    /// Bytes of the region the backup covers.
    pub backup_size: usize,
    /// Whether the backup covers the whole region.
    pub backup_full: bool,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(path)?;
    let geometry = store.geometry();

    let config_data_len = store.get_config_size()?;
    // An absent config still occupies its terminator slot once committed;
    // layout math is over the stored length.
    let total_size = PASSWORD_LEN + usize::from(config_data_len) + 1;

    let report = InspectReport {
        device_size: geometry.device_size,
        config_data_len,
        total_size,
        num_blocks: Geometry::num_blocks(total_size),
        crc16_addr: geometry.crc16_addr(),
        password_addr: geometry.password_addr(),
        config_addr: geometry.config_addr(),
        block_table_addr: geometry.block_table_addr(total_size),
        block_mirror_addr: geometry.block_mirror_addr(total_size),
        backup_addr: geometry.backup_addr(total_size),
        backup_size: geometry.backup_size(total_size),
        backup_full: geometry.backup_size(total_size) == total_size,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &InspectReport) {
    println!("Device image: {} bytes", report.device_size);
    println!();
    println!(
        "Config: {} data bytes (max {})",
        report.config_data_len,
        CONFIG_MAX_LEN - 1
    );
    println!(
        "Logical region: {} bytes in {} blocks of {}",
        report.total_size, report.num_blocks, BLOCK_SIZE
    );
    println!();
    println!("Layout:");
    println!("  CRC16 triple   @ {:#06x}", report.crc16_addr);
    println!("  Password       @ {:#06x}", report.password_addr);
    println!("  Config         @ {:#06x}", report.config_addr);
    println!("  Block table    @ {:#06x}", report.block_table_addr);
    println!("  Block mirror   @ {:#06x}", report.block_mirror_addr);
    println!("  Backup         @ {:#06x}", report.backup_addr);
    println!();
    if report.backup_full {
        println!("Backup covers the whole region ({} bytes)", report.backup_size);
    } else {
        println!(
            "Backup covers {} of {} region bytes",
            report.backup_size, report.total_size
        );
    }
}
