//! Checksum engine: whole-region CRC16 and per-block CRC8.
//!
//! Two independent codes protect the stored region:
//!
//! - **CRC16-CCITT** (poly `0x1021`, init `0xFFFF`) over the whole Logical
//!   Region, exposed incrementally so callers can interleave it with block
//!   reads without buffering the region.
//! - **CRC8** (poly `0x07`, init `0xFF`) over each fixed-size block,
//!   used to localize which block disagrees when the CRC16 does not match.
//!
//! Both are pure functions with no error conditions.

/// Initial state for an incremental CRC16 computation.
pub const CRC16_INIT: u16 = 0xFFFF;

/// Feeds one byte into a CRC16-CCITT state and returns the new state.
#[must_use]
pub fn crc16_update(mut crc: u16, byte: u8) -> u16 {
    crc ^= u16::from(byte) << 8;
    for _ in 0..8 {
        if crc & 0x8000 != 0 {
            crc = (crc << 1) ^ 0x1021;
        } else {
            crc <<= 1;
        }
    }
    crc
}

/// Computes the CRC16-CCITT of a byte slice in one call.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    data.iter()
        .fold(CRC16_INIT, |crc, &byte| crc16_update(crc, byte))
}

/// Computes the CRC8 of a block (poly `0x07`, init `0xFF`).
#[must_use]
pub fn crc8(block: &[u8]) -> u8 {
    let mut crc = 0xFFu8;
    for &byte in block {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x07;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
