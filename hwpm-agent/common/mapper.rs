use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{Aperture, MappedAperture};
use crate::common::{FakeRegisters, MmioRegion};
use crate::error::{HwpmError, Result};

/// Per-aperture reserve/release primitive
///
/// `map` brings an aperture's registers into reach; `unmap` is told about
/// exactly what `map` returned, right before the caller drops it. Borrowed
/// (aliased) mappings are never passed to `unmap`.
pub trait ApertureMapper {
    fn map(&self, aperture: &Aperture, fake_registers: bool) -> Result<MappedAperture>;

    fn unmap(&self, aperture: &Aperture, mapped: &MappedAperture) -> Result<()>;
}

/// Maps apertures from a physical memory device node such as `/dev/mem`
#[derive(Debug, Clone)]
pub struct DevMemMapper {
    device: PathBuf,
}

impl DevMemMapper {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl ApertureMapper for DevMemMapper {
    fn map(&self, aperture: &Aperture, fake_registers: bool) -> Result<MappedAperture> {
        let mmio = MmioRegion::map(&self.device, aperture.start_abs_pa, aperture.size())?;

        let fake = fake_registers.then(|| Arc::new(FakeRegisters::new(aperture.size())));

        Ok(MappedAperture {
            mmio: Some(Arc::new(mmio)),
            fake,
        })
    }

    fn unmap(&self, aperture: &Aperture, mapped: &MappedAperture) -> Result<()> {
        // The region unmaps itself once the last reference is dropped
        if let Some(mmio) = &mapped.mmio {
            if Arc::strong_count(mmio) > 1 {
                tracing::warn!(
                    "Aperture {} (0x{:08x}) still borrowed while being released",
                    aperture.name,
                    aperture.start_abs_pa
                );
            }
        }
        Ok(())
    }
}

/// Backs every aperture with a fake register buffer; nothing touches hardware
#[derive(Debug, Clone, Default)]
pub struct SimulatedMapper;

impl ApertureMapper for SimulatedMapper {
    fn map(&self, aperture: &Aperture, fake_registers: bool) -> Result<MappedAperture> {
        if !fake_registers {
            return Err(HwpmError::ConfigError(format!(
                "Cannot simulate aperture {} without fake registers enabled",
                aperture.name
            )));
        }

        tracing::debug!(
            "Allocated fake registers for {} (0x{:08x}, {} bytes)",
            aperture.name,
            aperture.start_abs_pa,
            aperture.size()
        );

        Ok(MappedAperture::simulated(FakeRegisters::new(aperture.size())))
    }

    fn unmap(&self, _aperture: &Aperture, _mapped: &MappedAperture) -> Result<()> {
        Ok(())
    }
}
