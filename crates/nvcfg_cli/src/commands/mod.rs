//! Command implementations for the nvcfg CLI.

pub mod auth;
pub mod config;
pub mod init;
pub mod inspect;
pub mod verify;

use nvcfg_core::{ConfigStore, Geometry};
use nvcfg_device::{BlockDevice, FileDevice};
use std::path::Path;

/// Opens an image file as a store; the file length is the device size.
pub(crate) fn open_store(
    path: &Path,
) -> Result<ConfigStore<FileDevice>, Box<dyn std::error::Error>> {
    let device = FileDevice::open(path)?;
    let geometry = Geometry::new().device_size(device.capacity());
    Ok(ConfigStore::new(device, geometry)?)
}

/// Formats bytes as lowercase hex.
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
