// Simulated register file backing an aperture when fake registers are enabled

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use hwpm_raw::io::{check_access, Result};
use hwpm_raw::RegisterIo;

/// Zero-initialised register buffer standing in for a mapped aperture
///
/// Reads and writes are counted so diagnostics (and tests) can tell how
/// many hardware accesses an operation would have issued.
#[derive(Debug)]
pub struct FakeRegisters {
    words: Mutex<Vec<u32>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FakeRegisters {
    /// Allocate a buffer covering `size` bytes of register space
    pub fn new(size: usize) -> Self {
        Self {
            words: Mutex::new(vec![0; size.div_ceil(4)]),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.words.lock().len() * 4
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set a register without counting it as a hardware access
    pub fn poke(&self, offset: u32, value: u32) -> Result<()> {
        let mut words = self.words.lock();
        let idx = check_access(offset, words.len() * 4)? / 4;
        words[idx] = value;
        Ok(())
    }

    /// Read a register without counting it as a hardware access
    pub fn peek(&self, offset: u32) -> Result<u32> {
        let words = self.words.lock();
        let idx = check_access(offset, words.len() * 4)? / 4;
        Ok(words[idx])
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl RegisterIo for FakeRegisters {
    fn read32(&self, offset: u32) -> Result<u32> {
        let value = self.peek(offset)?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    fn write32(&self, offset: u32, value: u32) -> Result<()> {
        self.poke(offset, value)?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
