//! RTR perfmux slots that address the PMA aperture through the router
//!
//! One physical aperture is reachable from both blocks. The RTR slot never
//! maps it on its own; it borrows PMA's mapping while reserved and forgets it
//! on release.

use crate::catalog::{HwpmIp, MappedAperture, PaRange, Perfmux};
use crate::error::{HwpmError, Result};

/// Snapshot of PMA's primary perfmux that RTR slots may borrow
#[derive(Debug, Clone)]
pub struct AliasSource {
    start_abs_pa: u64,
    range: PaRange,
    mapped: MappedAperture,
}

impl AliasSource {
    /// Capture PMA's primary perfmux; it must be present and mapped
    pub fn capture(pma: &HwpmIp) -> Result<Self> {
        let primary = pma.primary_perfmux().ok_or_else(|| {
            HwpmError::ResourceUnavailable(format!("{} has no primary perfmux", pma.name()))
        })?;
        let mapped = primary.mapped().ok_or_else(|| {
            HwpmError::ResourceUnavailable(format!("{} primary perfmux is not mapped", pma.name()))
        })?;

        Ok(Self {
            start_abs_pa: primary.start_abs_pa,
            range: primary.range(),
            mapped: mapped.clone(),
        })
    }

    pub fn start_abs_pa(&self) -> u64 {
        self.start_abs_pa
    }

    pub fn aliases(&self, perfmux: &Perfmux) -> bool {
        perfmux.start_abs_pa == self.start_abs_pa
    }

    /// Point `perfmux` at the captured mapping without mapping anything
    ///
    /// The fake register buffer is only shared in fake-register mode.
    pub fn share_into(&self, perfmux: &mut Perfmux, fake_registers: bool) {
        let mapped = MappedAperture {
            mmio: self.mapped.mmio.clone(),
            fake: if fake_registers {
                self.mapped.fake.clone()
            } else {
                None
            },
        };

        tracing::debug!(
            "{} perfmux 0x{:08x} borrows PMA mapping",
            perfmux.name,
            perfmux.start_abs_pa
        );

        perfmux.set_aliased(self.start_abs_pa, self.range, mapped);
    }
}

/// Absolute base of PMA's primary perfmux, the identity RTR slots alias
pub fn primary_pa(pma: &HwpmIp) -> Result<u64> {
    pma.primary_perfmux()
        .map(|primary| primary.start_abs_pa)
        .ok_or_else(|| {
            HwpmError::ResourceUnavailable(format!("{} has no primary perfmux", pma.name()))
        })
}

/// Forget a borrowed mapping; nothing is unmapped and the owner is untouched
pub fn release_alias(perfmux: &mut Perfmux) {
    perfmux.clear_alias();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{t234, Aperture, ApertureState};
    use crate::common::{ApertureMapper, SimulatedMapper};

    fn reserved_pma() -> HwpmIp {
        let mut pma = t234::pma();
        let perfmux = pma.perfmux_mut(0).unwrap();
        let mapped = SimulatedMapper.map(perfmux, true).unwrap();
        perfmux.set_owned(mapped);
        pma
    }

    #[test]
    fn test_capture_requires_mapping() {
        assert!(AliasSource::capture(&t234::pma()).is_err());
        assert!(AliasSource::capture(&reserved_pma()).is_ok());
    }

    #[test]
    fn test_share_into_borrows_owner_mapping() {
        let pma = reserved_pma();
        let source = AliasSource::capture(&pma).unwrap();
        let owner = pma.primary_perfmux().unwrap().mapped().unwrap();

        let mut rtr_pma = Aperture::new("pma", source.start_abs_pa(), source.start_abs_pa() + 0x1FFF, 0x2);
        assert!(source.aliases(&rtr_pma));

        source.share_into(&mut rtr_pma, true);
        assert!(rtr_pma.mapped().unwrap().shares_with(owner));
        assert_eq!(rtr_pma.range(), pma.primary_perfmux().unwrap().range());
        assert!(matches!(rtr_pma.state(), ApertureState::Aliased { owner_pa, .. } if *owner_pa == source.start_abs_pa()));
    }

    #[test]
    fn test_share_into_skips_fake_registers_outside_fake_mode() {
        let pma = reserved_pma();
        let source = AliasSource::capture(&pma).unwrap();
        let mut rtr_pma = Aperture::new("pma", source.start_abs_pa(), source.start_abs_pa() + 0x1FFF, 0x2);

        source.share_into(&mut rtr_pma, false);
        assert!(rtr_pma.mapped().unwrap().fake.is_none());
    }

    #[test]
    fn test_release_alias_leaves_owner_mapped() {
        let pma = reserved_pma();
        let source = AliasSource::capture(&pma).unwrap();
        let mut rtr_pma = Aperture::new("pma", source.start_abs_pa(), source.start_abs_pa() + 0x1FFF, 0x2);
        source.share_into(&mut rtr_pma, true);

        release_alias(&mut rtr_pma);
        assert!(!rtr_pma.is_reserved());
        assert!(rtr_pma.range().is_empty());
        assert!(pma.primary_perfmux().unwrap().owned().is_some());
    }
}
