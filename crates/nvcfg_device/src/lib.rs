//! # nvcfg Device
//!
//! Block device trait and backends for the nvcfg store.
//!
//! This crate provides the lowest-level abstraction of the stack: a
//! byte-addressable non-volatile memory with raw block read/write
//! primitives. Devices are **opaque byte stores** - they do not interpret
//! the data they hold. All layout and integrity logic lives in `nvcfg_core`.
//!
//! ## Design Principles
//!
//! - Devices expose exactly the primitives real EEPROM/flash drivers do:
//!   positioned block read and block write, nothing more
//! - No transactional guarantees, no wear-levelling - power can vanish
//!   between any two writes, and the store above must cope
//! - `nvcfg_core` owns all format interpretation
//!
//! ## Available Devices
//!
//! - [`MemoryDevice`] - For testing and fault-injection substrates
//! - [`FileDevice`] - A fixed-capacity file image for host-side tooling
//!
//! ## Example
//!
//! ```rust
//! use nvcfg_device::{BlockDevice, MemoryDevice};
//!
//! let mut device = MemoryDevice::new(1024);
//! device.write_block(16, b"hello").unwrap();
//! assert_eq!(device.read_block(16, 5).unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod device;
mod error;
mod file;
mod memory;

pub use device::BlockDevice;
pub use error::{DeviceError, DeviceResult};
pub use file::FileDevice;
pub use memory::{MemoryDevice, ERASED_BYTE};
