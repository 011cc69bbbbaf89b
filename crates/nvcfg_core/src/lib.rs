//! # nvcfg Core
//!
//! Commit and recovery engine for the nvcfg durable configuration store.
//!
//! The store persists two things in byte-addressable non-volatile memory
//! with no transactional guarantees of its own: a fixed-size password hash
//! and a variable-length, NUL-terminated config string. Power can be lost
//! between any two block writes, so every commit follows a fixed write
//! order whose final step - the CRC16 triple - is the commit point, and
//! every read re-validates the region from scratch, self-healing what it
//! can and failing loudly on what it cannot.
//!
//! ## On-device layout
//!
//! ```text
//! [CRC16 copy A (2B)][CRC16 copy B (2B)][CRC16 copy C (2B)]
//! [Password, PASSWORD_LEN bytes]
//! [Config, NUL-terminated, up to CONFIG_MAX_LEN bytes]
//! [Block-CRC8 table, N bytes][Block-CRC8 mirror, N bytes]
//! [Backup region, remaining device bytes]
//! ```
//!
//! The table, mirror, and backup addresses depend on the current config
//! length and are re-derived from the stored terminator on every
//! operation. Multi-byte integers are little-endian; the layout is
//! bit-exact and fixed for the format's lifetime.
//!
//! ## Integrity scheme
//!
//! - One CRC16-CCITT over the whole Logical Region, stored three times and
//!   resolved by majority vote on read
//! - One CRC8 per `BLOCK_SIZE` block, stored twice, used to localize
//!   corruption and decide whether the backup covers it
//! - A backup copy of the region prefix, as large as the remaining device
//!   space allows, used to restore corrupted primary bytes after the
//!   reconstruction passes CRC16 verification
//!
//! ## Example
//!
//! ```rust
//! use nvcfg_core::{ConfigStore, Geometry};
//! use nvcfg_device::MemoryDevice;
//!
//! let mut store = ConfigStore::new(MemoryDevice::new(1024), Geometry::default()).unwrap();
//! store.write_password(&[0xAB; 32]).unwrap();
//! store.save_config("in1=relay3").unwrap();
//!
//! assert_eq!(store.read_password().unwrap(), [0xAB; 32]);
//! assert_eq!(store.load_config().unwrap(), "in1=relay3");
//! assert_eq!(store.get_config_size().unwrap(), 10);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod checksum;
mod commit;
mod error;
mod layout;
mod recovery;
mod store;

pub use checksum::{crc16, crc16_update, crc8, CRC16_INIT};
pub use error::{StoreError, StoreResult};
pub use layout::{Geometry, BLOCK_SIZE, CONFIG_MAX_LEN, CRC16_COPIES, PASSWORD_LEN};
pub use store::ConfigStore;

/// Crate version, for tooling output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
