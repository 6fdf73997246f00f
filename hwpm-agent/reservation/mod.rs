//! Reservation engine for the PMA and RTR blocks
//!
//! PMA must be reserved before RTR and released after it. Both orderings
//! are checked explicitly. Reserving a reserved block, or releasing an
//! unreserved one, is a logged no-op.

pub mod alias;

use crate::catalog::{Aperture, HwpmIp, IpId};
use crate::common::ApertureMapper;
use crate::error::{HwpmError, Result};
use crate::session::Hwpm;

pub use alias::AliasSource;

fn missing(id: IpId) -> HwpmError {
    HwpmError::ResourceUnavailable(format!("{id} is not in the catalog"))
}

fn sub_resource(
    ip: IpId,
    kind: &'static str,
    index: usize,
    op: &'static str,
    source: HwpmError,
) -> HwpmError {
    HwpmError::SubResource {
        ip: ip.name(),
        kind,
        index,
        op,
        source: Box::new(source),
    }
}

/// Map a single perfmux or perfmon; already-owned apertures are left as they are
pub(crate) fn reserve_aperture(
    mapper: &dyn ApertureMapper,
    fake_registers: bool,
    aperture: &mut Aperture,
) -> Result<()> {
    if aperture.owned().is_some() {
        tracing::debug!("{} already mapped, ignoring", aperture.name);
        return Ok(());
    }

    let mapped = mapper.map(aperture, fake_registers)?;
    aperture.set_owned(mapped);
    Ok(())
}

/// Unmap a single perfmux or perfmon that this block owns
pub(crate) fn release_aperture(mapper: &dyn ApertureMapper, aperture: &mut Aperture) -> Result<()> {
    if aperture.is_aliased() {
        return Err(HwpmError::Mapping(format!(
            "{} (0x{:08x}) is borrowed and cannot be unmapped by its holder",
            aperture.name, aperture.start_abs_pa
        )));
    }

    let Some(mapped) = aperture.owned() else {
        return Ok(());
    };
    mapper.unmap(aperture, mapped)?;
    aperture.take_owned();
    Ok(())
}

/// Compensating release of every PMA perfmux after a failed perfmon reserve
///
/// Keeps going past individual failures; those are only logged.
fn rollback_perfmuxes(mapper: &dyn ApertureMapper, ip: &mut HwpmIp) {
    let id = ip.id;
    for slot in 0..ip.num_perfmux_slots() {
        let Some(perfmux) = ip.perfmux_mut(slot) else {
            continue;
        };

        if let Err(e) = release_aperture(mapper, perfmux) {
            tracing::error!("{} perfmux {} release failed: {}", id, slot, e);
        }

        let mask = perfmux.hw_inst_mask;
        ip.fs_mask &= !mask;
    }
}

pub fn reserve_pma(hwpm: &mut Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    let fake_registers = hwpm.fake_registers;
    let mapper = hwpm.mapper.as_ref();
    let pma = hwpm.chip.ip_mut(IpId::Pma).ok_or_else(|| missing(IpId::Pma))?;

    if pma.reserved {
        tracing::debug!("PMA already reserved, ignoring");
        return Ok(());
    }

    for slot in 0..pma.num_perfmux_slots() {
        let Some(perfmux) = pma.perfmux_mut(slot) else {
            continue;
        };

        // PMA is a HWPM component: its perfmuxes are reserved like perfmons
        if let Err(e) = reserve_aperture(mapper, fake_registers, perfmux) {
            tracing::error!("PMA perfmux {} reserve failed: {}", slot, e);
            return Err(sub_resource(IpId::Pma, "perfmux", slot, "reserve", e));
        }

        let mask = perfmux.hw_inst_mask;
        pma.fs_mask |= mask;
    }

    for slot in 0..pma.num_perfmon_slots() {
        let Some(perfmon) = pma.perfmon_mut(slot) else {
            continue;
        };

        if let Err(e) = reserve_aperture(mapper, fake_registers, perfmon) {
            tracing::error!("PMA perfmon {} reserve failed: {}", slot, e);
            rollback_perfmuxes(mapper, pma);
            return Err(sub_resource(IpId::Pma, "perfmon", slot, "reserve", e));
        }
    }

    pma.reserved = true;
    tracing::info!("PMA reserved (fs_mask 0x{:x})", pma.fs_mask);

    Ok(())
}

pub fn release_pma(hwpm: &mut Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    let mapper = hwpm.mapper.as_ref();
    let pma = hwpm.chip.ip_mut(IpId::Pma).ok_or_else(|| missing(IpId::Pma))?;

    if !pma.reserved {
        tracing::debug!("PMA wasn't mapped, ignoring");
        return Ok(());
    }

    for slot in 0..pma.num_perfmux_slots() {
        let Some(perfmux) = pma.perfmux_mut(slot) else {
            continue;
        };

        if let Err(e) = release_aperture(mapper, perfmux) {
            tracing::error!("PMA perfmux {} release failed: {}", slot, e);
            return Err(sub_resource(IpId::Pma, "perfmux", slot, "release", e));
        }

        let mask = perfmux.hw_inst_mask;
        pma.fs_mask &= !mask;
    }

    for slot in 0..pma.num_perfmon_slots() {
        let Some(perfmon) = pma.perfmon_mut(slot) else {
            continue;
        };

        if let Err(e) = release_aperture(mapper, perfmon) {
            tracing::error!("PMA perfmon {} release failed: {}", slot, e);
            return Err(sub_resource(IpId::Pma, "perfmon", slot, "release", e));
        }
    }

    pma.reserved = false;
    tracing::info!("PMA released");

    Ok(())
}

pub fn reserve_rtr(hwpm: &mut Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    let fake_registers = hwpm.fake_registers;
    let mapper = hwpm.mapper.as_ref();

    let pma = hwpm.chip.ip(IpId::Pma).ok_or_else(|| missing(IpId::Pma))?;
    if !pma.reserved {
        tracing::error!("PMA should be reserved before RTR");
        return Err(HwpmError::OrderingViolation(
            "PMA should be reserved before RTR".to_string(),
        ));
    }

    let rtr = hwpm.chip.ip(IpId::Rtr).ok_or_else(|| missing(IpId::Rtr))?;
    if rtr.reserved {
        tracing::debug!("RTR already reserved, ignoring");
        return Ok(());
    }

    let source = AliasSource::capture(pma)?;
    let rtr = hwpm.chip.ip_mut(IpId::Rtr).ok_or_else(|| missing(IpId::Rtr))?;

    for slot in 0..rtr.num_perfmux_slots() {
        let Some(perfmux) = rtr.perfmux_mut(slot) else {
            continue;
        };

        if source.aliases(perfmux) {
            // PMA aperture as seen from the router
            source.share_into(perfmux, fake_registers);
        } else if let Err(e) = reserve_aperture(mapper, fake_registers, perfmux) {
            // Slots processed so far stay reserved
            tracing::error!("RTR perfmux {} reserve failed: {}", slot, e);
            return Err(sub_resource(IpId::Rtr, "perfmux", slot, "reserve", e));
        }

        let mask = perfmux.hw_inst_mask;
        rtr.fs_mask |= mask;
    }

    // RTR has no perfmons

    rtr.reserved = true;
    tracing::info!("RTR reserved (fs_mask 0x{:x})", rtr.fs_mask);

    Ok(())
}

pub fn release_rtr(hwpm: &mut Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    let mapper = hwpm.mapper.as_ref();

    let pma = hwpm.chip.ip(IpId::Pma).ok_or_else(|| missing(IpId::Pma))?;
    if !pma.reserved {
        tracing::error!("PMA shouldn't be released before RTR");
        return Err(HwpmError::OrderingViolation(
            "PMA shouldn't be released before RTR".to_string(),
        ));
    }

    let rtr = hwpm.chip.ip(IpId::Rtr).ok_or_else(|| missing(IpId::Rtr))?;
    if !rtr.reserved {
        tracing::debug!("RTR wasn't mapped, ignoring");
        return Ok(());
    }

    let pma_pa = alias::primary_pa(pma)?;
    let rtr = hwpm.chip.ip_mut(IpId::Rtr).ok_or_else(|| missing(IpId::Rtr))?;

    for slot in 0..rtr.num_perfmux_slots() {
        let Some(perfmux) = rtr.perfmux_mut(slot) else {
            continue;
        };

        if perfmux.start_abs_pa == pma_pa {
            alias::release_alias(perfmux);
        } else if let Err(e) = release_aperture(mapper, perfmux) {
            tracing::error!("RTR perfmux {} release failed: {}", slot, e);
            return Err(sub_resource(IpId::Rtr, "perfmux", slot, "release", e));
        }

        let mask = perfmux.hw_inst_mask;
        rtr.fs_mask &= !mask;
    }

    // RTR has no perfmons

    rtr.reserved = false;
    tracing::info!("RTR released");

    Ok(())
}
