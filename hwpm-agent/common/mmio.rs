use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};
use std::ffi::c_void;
use std::fs::OpenOptions;
use std::num::NonZeroUsize;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::ptr::NonNull;

use hwpm_raw::io::{check_access, Result as IoResult};
use hwpm_raw::RegisterIo;

use crate::error::{HwpmError, Result};

const PAGE_SIZE: u64 = 4096;

/// A physical register aperture mapped through a memory device node
pub struct MmioRegion {
    base: NonNull<c_void>,
    map_len: usize,
    page_offset: usize,
    len: usize,
    phys_addr: u64,
}

impl MmioRegion {
    /// Map `len` bytes of physical address space starting at `phys_addr`
    pub fn map(device: &Path, phys_addr: u64, len: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .map_err(|e| {
                HwpmError::Mapping(format!("Failed to open {}: {e}", device.display()))
            })?;

        let page_base = phys_addr & !(PAGE_SIZE - 1);
        let page_offset = (phys_addr - page_base) as usize;
        let map_len = NonZeroUsize::new(page_offset + len).ok_or_else(|| {
            HwpmError::Mapping(format!("Empty aperture at 0x{phys_addr:X}"))
        })?;
        let offset = libc::off_t::try_from(page_base).map_err(|_| {
            HwpmError::Mapping(format!("Physical address 0x{phys_addr:X} out of range"))
        })?;

        // SAFETY: a fresh shared mapping of the device; nothing else aliases it
        // until this region hands out accesses.
        let ptr = unsafe {
            mmap(
                None,
                map_len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                Some(&file),
                offset,
            )
        }
        .map_err(|e| {
            HwpmError::Mapping(format!(
                "Failed to map 0x{phys_addr:X}+0x{len:X} from {}: {e}",
                device.display()
            ))
        })?;

        let base = NonNull::new(ptr).ok_or_else(|| {
            HwpmError::Mapping(format!("mmap returned null for 0x{phys_addr:X}"))
        })?;

        tracing::debug!(
            "Mapped aperture 0x{:08x}..0x{:08x}",
            phys_addr,
            phys_addr + len as u64 - 1
        );

        Ok(Self {
            base,
            map_len: map_len.get(),
            page_offset,
            len,
            phys_addr,
        })
    }

    fn reg_ptr(&self, offset: u32) -> IoResult<*mut u32> {
        let start = check_access(offset, self.len)?;
        // SAFETY: check_access keeps the 4-byte access inside the mapping.
        Ok(unsafe { (self.base.as_ptr() as *mut u8).add(self.page_offset + start) as *mut u32 })
    }
}

impl RegisterIo for MmioRegion {
    fn read32(&self, offset: u32) -> IoResult<u32> {
        let ptr = self.reg_ptr(offset)?;
        // SAFETY: aligned, in-bounds pointer into a live device mapping.
        let value = unsafe { std::ptr::read_volatile(ptr) };
        tracing::trace!(
            "MMIO read: 0x{:08x} = 0x{:08x}",
            self.phys_addr + offset as u64,
            value
        );
        Ok(value)
    }

    fn write32(&self, offset: u32, value: u32) -> IoResult<()> {
        let ptr = self.reg_ptr(offset)?;
        tracing::trace!(
            "MMIO write: 0x{:08x} <- 0x{:08x}",
            self.phys_addr + offset as u64,
            value
        );
        // SAFETY: aligned, in-bounds pointer into a live device mapping.
        unsafe { std::ptr::write_volatile(ptr, value) };
        Ok(())
    }
}

impl std::fmt::Debug for MmioRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmioRegion")
            .field("phys_addr", &format_args!("0x{:08x}", self.phys_addr))
            .field("len", &self.len)
            .finish()
    }
}

impl Drop for MmioRegion {
    fn drop(&mut self) {
        // SAFETY: base/map_len are exactly what mmap returned.
        if let Err(e) = unsafe { munmap(self.base.as_ptr(), self.map_len) } {
            tracing::warn!("Failed to unmap aperture 0x{:08x}: {}", self.phys_addr, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_missing_device_fails() {
        let result = MmioRegion::map(Path::new("/nonexistent/mem"), 0x1000, 0x1000);
        assert!(matches!(result, Err(HwpmError::Mapping(_))));
    }
}
