//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Failures are local to a single operation and never leave the caller with
/// partially corrupted data: an operation either returns verified bytes or
/// one of these.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Raw device access failed.
    #[error("device error: {0}")]
    Device(#[from] nvcfg_device::DeviceError),

    /// Config text does not fit the Config Section.
    #[error("config too large: {len} data bytes, maximum {max}")]
    ConfigTooLarge {
        /// Data length of the rejected config, excluding terminator.
        len: usize,
        /// Maximum data length the section can hold.
        max: usize,
    },

    /// Config text contains a NUL byte, which is the on-device terminator.
    #[error("config text contains an embedded NUL byte")]
    EmbeddedNul,

    /// A block write did not read back as written.
    #[error("write verification failed at addr {addr} ({len} bytes)")]
    WriteVerify {
        /// Device address of the failed write.
        addr: u32,
        /// Length of the failed write.
        len: usize,
    },

    /// The three stored CRC16 copies mutually disagree; no majority exists.
    #[error("CRC16 vote failed: copies {a:#06x}, {b:#06x}, {c:#06x} all differ")]
    ChecksumVote {
        /// First stored copy.
        a: u16,
        /// Second stored copy.
        b: u16,
        /// Third stored copy.
        c: u16,
    },

    /// Corruption was detected and could not be repaired from backup.
    #[error("unrecoverable read: {message}")]
    Unrecoverable {
        /// What failed and where.
        message: String,
    },

    /// The scanned region size is inconsistent with the layout bounds.
    #[error("stored region out of range: total size {total_size}, maximum {max}")]
    OutOfRange {
        /// Derived total size of the Logical Region.
        total_size: usize,
        /// Maximum the layout permits.
        max: usize,
    },

    /// The geometry does not fit the device.
    #[error("invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the mismatch.
        message: String,
    },

    /// Stored config bytes are not valid UTF-8.
    #[error("stored config is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl StoreError {
    /// Creates an unrecoverable-read error.
    pub fn unrecoverable(message: impl Into<String>) -> Self {
        Self::Unrecoverable {
            message: message.into(),
        }
    }

    /// Creates an invalid-geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}
