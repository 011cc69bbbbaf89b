//! Init command implementation.

use nvcfg_core::Geometry;
use nvcfg_device::FileDevice;
use std::path::Path;

/// Creates an erased image of `size` bytes at `path`.
pub fn run(path: &Path, size: u32) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = Geometry::new().device_size(size);
    geometry.validate(size)?;

    FileDevice::create(path, size)?;
    println!("Created erased {size}-byte image at {}", path.display());
    Ok(())
}
