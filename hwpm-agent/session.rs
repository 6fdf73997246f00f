// Session handle: active chip catalog, register mode and aperture mapper

use hwpm_raw::RegisterIo;

use crate::catalog::{Aperture, Chip, HwpmIp, IpId};
use crate::common::{ApertureMapper, DevMemMapper, SimulatedMapper};
use crate::config::{PollConfig, SessionConfig};
use crate::error::{HwpmError, Result};

/// State shared by every HWPM operation
///
/// All operations take the session explicitly; callers serialise access
/// themselves (the session has no internal locking).
pub struct Hwpm {
    pub(crate) chip: Chip,
    pub(crate) fake_registers: bool,
    pub(crate) poll: PollConfig,
    pub(crate) mapper: Box<dyn ApertureMapper>,
}

impl Hwpm {
    pub fn new(chip: Chip, config: &SessionConfig, mapper: Box<dyn ApertureMapper>) -> Self {
        tracing::info!(
            "HWPM session on {} ({} registers)",
            chip.name,
            if config.fake_registers { "fake" } else { "mapped" }
        );

        Self {
            chip,
            fake_registers: config.fake_registers,
            poll: config.poll,
            mapper,
        }
    }

    /// Pick the mapper matching the configuration
    pub fn from_config(chip: Chip, config: &SessionConfig) -> Self {
        let mapper: Box<dyn ApertureMapper> = if config.fake_registers {
            Box::new(SimulatedMapper)
        } else {
            Box::new(DevMemMapper::new(config.devmem_path.clone()))
        };
        Self::new(chip, config, mapper)
    }

    pub fn chip(&self) -> &Chip {
        &self.chip
    }

    pub fn poll_config(&self) -> PollConfig {
        self.poll
    }

    pub fn ip(&self, id: IpId) -> Result<&HwpmIp> {
        self.chip
            .ip(id)
            .ok_or_else(|| HwpmError::ResourceUnavailable(format!("{id} is not in the catalog")))
    }

    fn io<'a>(&self, aperture: &'a Aperture) -> Result<&'a dyn RegisterIo> {
        aperture
            .mapped()
            .and_then(|mapped| mapped.io(self.fake_registers))
            .ok_or_else(|| {
                HwpmError::ResourceUnavailable(format!(
                    "Aperture {} (0x{:08x}) is not mapped",
                    aperture.name, aperture.start_abs_pa
                ))
            })
    }

    pub fn readl(&self, aperture: &Aperture, offset: u32) -> Result<u32> {
        let value = self.io(aperture)?.read32(offset)?;
        tracing::trace!("{} read 0x{:04x} = 0x{:08x}", aperture.name, offset, value);
        Ok(value)
    }

    pub fn writel(&self, aperture: &Aperture, offset: u32, value: u32) -> Result<()> {
        tracing::trace!("{} write 0x{:04x} <- 0x{:08x}", aperture.name, offset, value);
        self.io(aperture)?.write32(offset, value)?;
        Ok(())
    }

    /// Read-modify-write the bits of `mask` at `offset`, returning the value written
    pub fn update_field(&self, aperture: &Aperture, offset: u32, mask: u32, value: u32) -> Result<u32> {
        let written = self.io(aperture)?.update32(offset, mask, value)?;
        tracing::trace!(
            "{} update 0x{:04x} mask 0x{:08x} -> 0x{:08x}",
            aperture.name,
            offset,
            mask,
            written
        );
        Ok(written)
    }
}
