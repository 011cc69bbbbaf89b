//! Seeded stores and sample secrets for integration tests.

use nvcfg_core::{ConfigStore, Geometry, PASSWORD_LEN};
use nvcfg_device::MemoryDevice;

/// A recognizable sample password hash.
pub const SAMPLE_HASH: [u8; PASSWORD_LEN] = [0xA5; PASSWORD_LEN];

/// A second, distinct sample hash.
pub const OTHER_HASH: [u8; PASSWORD_LEN] = [0x3C; PASSWORD_LEN];

/// A sample pin-config string in the node's CSV dialect.
pub const SAMPLE_CONFIG: &str = "S,relay_a,3/S,relay_b,5/I,btn,7,relay_a";

/// Creates a store over a fresh erased 1 KiB device.
///
/// # Panics
///
/// Panics if the default geometry is invalid, which would be a test-setup
/// bug.
#[must_use]
pub fn fresh_store() -> ConfigStore<MemoryDevice> {
    ConfigStore::new(MemoryDevice::new(1024), Geometry::default()).unwrap()
}

/// Creates a store seeded with [`SAMPLE_HASH`] and the given config.
///
/// # Panics
///
/// Panics if seeding fails, which would be a test-setup bug.
#[must_use]
pub fn seeded_store(config: &str) -> ConfigStore<MemoryDevice> {
    let mut store = fresh_store();
    store.write_password(&SAMPLE_HASH).unwrap();
    store.save_config(config).unwrap();
    store
}

/// Captures a store's device image, e.g. to seed a [`crate::FaultDevice`].
#[must_use]
pub fn image_of(store: ConfigStore<MemoryDevice>) -> Vec<u8> {
    store.into_device().image()
}

/// Reopens a captured image as a store.
///
/// # Panics
///
/// Panics if the default geometry is invalid for the image.
#[must_use]
pub fn reopen(image: Vec<u8>) -> ConfigStore<MemoryDevice> {
    ConfigStore::new(MemoryDevice::with_image(image), Geometry::default()).unwrap()
}
