//! 32-bit register access primitives
//!
//! Backends (memory-mapped apertures, simulated register buffers) live in
//! the agent crate; this module only fixes the access contract every
//! backend honours.

use crate::register::set_field;

pub type Result<T> = std::result::Result<T, IoError>;

/// Errors that can occur during register access
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Register offset 0x{offset:X} is outside aperture of {len} bytes")]
    OutOfRange { offset: u32, len: usize },

    #[error("Register offset 0x{offset:X} is not 32-bit aligned")]
    Unaligned { offset: u32 },
}

/// Read/write access to 32-bit registers at byte offsets within an aperture
///
/// Accesses are performed in program order; no barrier semantics beyond
/// that are implied.
pub trait RegisterIo {
    /// Read the register at `offset`
    fn read32(&self, offset: u32) -> Result<u32>;

    /// Write `value` to the register at `offset`
    fn write32(&self, offset: u32, value: u32) -> Result<()>;

    /// Read-modify-write the bits selected by `mask`, returning the value written
    fn update32(&self, offset: u32, mask: u32, value: u32) -> Result<u32> {
        let reg = set_field(self.read32(offset)?, mask, value);
        self.write32(offset, reg)?;
        Ok(reg)
    }
}

/// Check that a 32-bit access at `offset` fits in an aperture of `len` bytes
pub fn check_access(offset: u32, len: usize) -> Result<usize> {
    if offset % 4 != 0 {
        return Err(IoError::Unaligned { offset });
    }

    let start = offset as usize;
    match start.checked_add(4) {
        Some(end) if end <= len => Ok(start),
        _ => Err(IoError::OutOfRange { offset, len }),
    }
}
