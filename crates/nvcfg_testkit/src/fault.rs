//! Power-cut fault injection for block devices.

use nvcfg_device::{BlockDevice, DeviceResult};

/// A device wrapper that models power loss between block writes.
///
/// The first `writes_before_cut` writes pass through to the wrapped
/// device; every later write is silently dropped, exactly as a device
/// whose supply vanished would leave those bytes unwritten. Reads always
/// pass through, so after the "cut" the wrapper serves the post-crash
/// image and [`Self::into_inner`] hands it back for reopening.
///
/// Dropped writes also exercise the store's read-back verification: the
/// commit in flight observes a mismatch and reports a write failure, just
/// as firmware would on a dying supply rail.
///
/// # Example
///
/// ```rust
/// use nvcfg_device::{BlockDevice, MemoryDevice};
/// use nvcfg_testkit::FaultDevice;
///
/// let mut device = FaultDevice::new(MemoryDevice::new(64), 1);
/// device.write_block(0, &[1]).unwrap(); // persisted
/// device.write_block(1, &[2]).unwrap(); // dropped: power is gone
/// assert_eq!(device.read_block(1, 1).unwrap(), [0xFF]);
/// assert_eq!(device.dropped_writes(), 1);
/// ```
#[derive(Debug)]
pub struct FaultDevice<D: BlockDevice> {
    inner: D,
    writes_before_cut: usize,
    writes_seen: usize,
    dropped: usize,
}

impl<D: BlockDevice> FaultDevice<D> {
    /// Wraps `inner`, cutting power after `writes_before_cut` writes.
    #[must_use]
    pub fn new(inner: D, writes_before_cut: usize) -> Self {
        Self {
            inner,
            writes_before_cut,
            writes_seen: 0,
            dropped: 0,
        }
    }

    /// Number of writes silently dropped so far.
    #[must_use]
    pub fn dropped_writes(&self) -> usize {
        self.dropped
    }

    /// Unwraps the post-crash device image.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: BlockDevice> BlockDevice for FaultDevice<D> {
    fn read_block(&self, addr: u32, len: usize) -> DeviceResult<Vec<u8>> {
        self.inner.read_block(addr, len)
    }

    fn write_block(&mut self, addr: u32, bytes: &[u8]) -> DeviceResult<()> {
        if self.writes_seen >= self.writes_before_cut {
            self.writes_seen += 1;
            self.dropped += 1;
            return Ok(());
        }
        self.writes_seen += 1;
        self.inner.write_block(addr, bytes)
    }

    fn capacity(&self) -> u32 {
        self.inner.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvcfg_device::MemoryDevice;

    #[test]
    fn writes_pass_through_until_the_cut() {
        let mut device = FaultDevice::new(MemoryDevice::new(16), 2);
        device.write_block(0, &[1]).unwrap();
        device.write_block(1, &[2]).unwrap();
        device.write_block(2, &[3]).unwrap();

        assert_eq!(device.read_block(0, 3).unwrap(), [1, 2, 0xFF]);
        assert_eq!(device.dropped_writes(), 1);
    }

    #[test]
    fn cut_at_zero_drops_everything() {
        let mut device = FaultDevice::new(MemoryDevice::new(16), 0);
        device.write_block(0, &[1]).unwrap();
        assert_eq!(device.read_block(0, 1).unwrap(), [0xFF]);
        assert_eq!(device.dropped_writes(), 1);
    }

    #[test]
    fn into_inner_returns_post_crash_image() {
        let mut device = FaultDevice::new(MemoryDevice::new(4), 1);
        device.write_block(0, &[0xAA]).unwrap();
        device.write_block(1, &[0xBB]).unwrap();

        let image = device.into_inner().image();
        assert_eq!(image, vec![0xAA, 0xFF, 0xFF, 0xFF]);
    }
}
