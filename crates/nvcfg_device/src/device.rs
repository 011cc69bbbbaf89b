//! Block device trait definition.

use crate::error::DeviceResult;

/// A byte-addressable non-volatile memory device.
///
/// Devices are **opaque byte stores** offering only raw positioned reads and
/// writes, modeled after the `read_block`/`write_block` primitives that real
/// EEPROM and emulated-flash drivers expose. There are no transactional
/// guarantees: a write may be torn by power loss, and nothing on the device
/// tells a reader whether that happened. The store layered on top owns all
/// integrity machinery.
///
/// # Invariants
///
/// - `read_block` returns exactly the bytes most recently written at that
///   address range (or the erased pattern where never written)
/// - `write_block` either persists all bytes or reports an error; silent
///   partial persistence across power loss is the fault model, not an
///   API-level behavior
/// - Every access is bounds-checked against `capacity`
///
/// # Implementors
///
/// - [`super::MemoryDevice`] - For testing
/// - [`super::FileDevice`] - For host-side image tooling
pub trait BlockDevice: Send + Sync {
    /// Reads `len` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range exceeds the device capacity or an I/O
    /// error occurs.
    fn read_block(&self, addr: u32, len: usize) -> DeviceResult<Vec<u8>>;

    /// Writes `bytes` starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range exceeds the device capacity or an I/O
    /// error occurs.
    fn write_block(&mut self, addr: u32, bytes: &[u8]) -> DeviceResult<()>;

    /// Returns the device capacity in bytes.
    fn capacity(&self) -> u32;
}
