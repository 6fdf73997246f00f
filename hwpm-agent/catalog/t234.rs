// T234 chip catalog

use hwpm_raw::arch::t234::{addr_map, ip};

use super::{Aperture, Chip, HwpmIp, IpId};

pub fn pma() -> HwpmIp {
    HwpmIp::new(
        IpId::Pma,
        vec![Aperture::new(
            "pma",
            addr_map::PMA_BASE,
            addr_map::PMA_LIMIT,
            0x1,
        )],
        Vec::with_capacity(ip::pma::NUM_PERFMON_PER_INST),
    )
}

pub fn rtr() -> HwpmIp {
    // Order follows ip::rtr::RTR_PERFMUX_INDEX and ip::rtr::PMA_PERFMUX_INDEX
    let perfmuxes = vec![
        Aperture::new("rtr", addr_map::RTR_BASE, addr_map::RTR_LIMIT, 0x1),
        Aperture::new("pma", addr_map::PMA_BASE, addr_map::PMA_LIMIT, 0x2),
    ];
    debug_assert_eq!(perfmuxes.len(), ip::rtr::NUM_PERFMUX_PER_INST);

    HwpmIp::new(
        IpId::Rtr,
        perfmuxes,
        Vec::with_capacity(ip::rtr::NUM_PERFMON_PER_INST),
    )
}

#[cfg(feature = "mss-iso-niso-hubs")]
pub fn mss_iso_niso_hubs() -> HwpmIp {
    use ip::mss_iso_niso_hubs::{NUM_INSTANCES, NUM_PERFMON_PER_INST, NUM_PERFMUX_PER_INST};

    let perfmuxes = (0..NUM_INSTANCES * NUM_PERFMUX_PER_INST)
        .map(|i| {
            let start = addr_map::MSS_HUB_PERFMUX_BASE + i as u64 * addr_map::MSS_HUB_PERFMUX_STRIDE;
            Aperture::new(
                "mss_hub_perfmux",
                start,
                start + addr_map::PERFMUX_APERTURE_SIZE - 1,
                1 << (i / NUM_PERFMUX_PER_INST),
            )
        })
        .collect();

    let perfmons = (0..NUM_INSTANCES * NUM_PERFMON_PER_INST)
        .map(|i| {
            let start = addr_map::MSS_HUB_PERFMON_BASE + i as u64 * addr_map::PERFMON_APERTURE_SIZE;
            Aperture::new(
                "mss_hub_perfmon",
                start,
                start + addr_map::PERFMON_APERTURE_SIZE - 1,
                1 << (i / NUM_PERFMON_PER_INST),
            )
        })
        .collect();

    HwpmIp::new(IpId::MssIsoNisoHubs, perfmuxes, perfmons)
}

/// Catalog of every HWPM IP compiled in for T234
pub fn chip() -> Chip {
    let chip = Chip::new("t234").with_ip(pma()).with_ip(rtr());

    #[cfg(feature = "mss-iso-niso-hubs")]
    let chip = chip.with_ip(mss_iso_niso_hubs());

    chip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtr_aliases_pma_primary() {
        let chip = chip();
        let pma = chip.ip(IpId::Pma).unwrap();
        let rtr = chip.ip(IpId::Rtr).unwrap();

        let pma_primary = pma.primary_perfmux().unwrap();
        let rtr_pma = rtr.perfmux(ip::rtr::PMA_PERFMUX_INDEX).unwrap();
        assert_eq!(rtr_pma.start_abs_pa, pma_primary.start_abs_pa);

        let rtr_own = rtr.static_perfmux(ip::rtr::RTR_PERFMUX_INDEX).unwrap();
        assert_ne!(rtr_own.start_abs_pa, pma_primary.start_abs_pa);
    }

    #[test]
    fn test_pma_and_rtr_have_no_perfmons() {
        let chip = chip();
        assert_eq!(chip.ip(IpId::Pma).unwrap().num_perfmon_slots(), 0);
        assert_eq!(chip.ip(IpId::Rtr).unwrap().num_perfmon_slots(), 0);
    }

    #[cfg(feature = "mss-iso-niso-hubs")]
    #[test]
    fn test_mss_hubs_slot_counts() {
        let hubs = mss_iso_niso_hubs();
        assert_eq!(hubs.num_perfmux_slots(), 9);
        assert_eq!(hubs.num_perfmon_slots(), 2);
        assert_eq!(hubs.perfmux(8).unwrap().hw_inst_mask, 0x1);
    }

    #[cfg(not(feature = "mss-iso-niso-hubs"))]
    #[test]
    fn test_mss_hubs_compiled_out() {
        assert!(chip().ip(IpId::MssIsoNisoHubs).is_none());
    }
}
