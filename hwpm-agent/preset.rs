// Production register presets and second-level clock gating

use hwpm_raw::arch::t234::{ip, pmasys, pmmsys};

use crate::catalog::{HwpmIp, IpId, Perfmux};
use crate::error::{HwpmError, Result};
use crate::session::Hwpm;

/// Apply the production coalescing timeouts to the PMA
///
/// Assumes the caller already reserved PMA; only the perfmux's presence is
/// checked here.
pub fn init_prod_values(hwpm: &Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    let pma_perfmux = hwpm.ip(IpId::Pma)?.primary_perfmux().ok_or_else(|| {
        HwpmError::ResourceUnavailable("PMA has no primary perfmux".to_string())
    })?;

    let controlb = pmasys::controlb::COALESCE_TIMEOUT_CYCLES;
    hwpm.update_field(
        pma_perfmux,
        pmasys::CONTROLB,
        controlb.mask(),
        controlb.encode(pmasys::controlb::COALESCE_TIMEOUT_CYCLES_PROD),
    )?;

    let channel = pmasys::channel_config_user::COALESCE_TIMEOUT_CYCLES;
    hwpm.update_field(
        pma_perfmux,
        pmasys::channel_config_user(0),
        channel.mask(),
        channel.encode(pmasys::channel_config_user::COALESCE_TIMEOUT_CYCLES_PROD),
    )?;

    Ok(())
}

fn reserved_ip(hwpm: &Hwpm, id: IpId) -> Result<&HwpmIp> {
    match hwpm.chip().ip(id) {
        Some(ip) if ip.reserved => Ok(ip),
        _ => {
            tracing::error!("{} uninitialized", id);
            Err(HwpmError::ResourceUnavailable(format!("{id} uninitialized")))
        }
    }
}

/// PMA primary perfmux and RTR control perfmux, both blocks reserved
fn slcg_apertures(hwpm: &Hwpm) -> Result<(&Perfmux, &Perfmux)> {
    let pma = reserved_ip(hwpm, IpId::Pma)?;
    let rtr = reserved_ip(hwpm, IpId::Rtr)?;

    let pma_perfmux = pma.primary_perfmux().ok_or_else(|| {
        HwpmError::ResourceUnavailable("PMA has no primary perfmux".to_string())
    })?;
    let rtr_perfmux = rtr
        .static_perfmux(ip::rtr::RTR_PERFMUX_INDEX)
        .ok_or_else(|| HwpmError::ResourceUnavailable("RTR has no control perfmux".to_string()))?;

    Ok((pma_perfmux, rtr_perfmux))
}

fn program_slcg(hwpm: &Hwpm, pma_slcg: u32, rtr_slcg: u32) -> Result<()> {
    let (pma_perfmux, rtr_perfmux) = slcg_apertures(hwpm)?;

    let slcg = pmasys::cg2::SLCG;
    hwpm.update_field(pma_perfmux, pmasys::CG2, slcg.mask(), slcg.encode(pma_slcg))?;

    hwpm.update_field(
        rtr_perfmux,
        pmmsys::SYS0ROUTER_CG2,
        pmmsys::sys0router_cg2::SLCG_MASK,
        rtr_slcg,
    )?;

    Ok(())
}

pub fn disable_slcg(hwpm: &Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    program_slcg(
        hwpm,
        pmasys::cg2::SLCG_DISABLED,
        pmmsys::sys0router_cg2::SLCG_ALL_DISABLED,
    )
}

pub fn enable_slcg(hwpm: &Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    program_slcg(
        hwpm,
        pmasys::cg2::SLCG_ENABLED,
        pmmsys::sys0router_cg2::SLCG_ALL_PROD,
    )
}
