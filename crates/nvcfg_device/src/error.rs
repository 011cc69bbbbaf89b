//! Error types for device operations.

use std::io;
use thiserror::Error;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors that can occur during raw device access.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An access fell outside the device's address range.
    #[error("access out of bounds: addr {addr}, len {len}, capacity {capacity}")]
    OutOfBounds {
        /// The requested address.
        addr: u32,
        /// The requested length in bytes.
        len: usize,
        /// The device capacity in bytes.
        capacity: u32,
    },
}
