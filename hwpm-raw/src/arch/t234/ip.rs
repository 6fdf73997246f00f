//! Per-IP instance and slot counts
//!
//! These counts are normally generated alongside the register headers.
//! IPs that are compiled out have no descriptor here.

/// PMA: a single perfmux covering the whole aggregator aperture
pub mod pma {
    pub const NUM_INSTANCES: usize = 1;
    pub const NUM_PERFMON_PER_INST: usize = 0;
    pub const NUM_PERFMUX_PER_INST: usize = 1;
}

/// Router: its own control aperture plus the PMA aperture seen from the router
pub mod rtr {
    pub const NUM_INSTANCES: usize = 1;
    pub const NUM_PERFMON_PER_INST: usize = 0;
    pub const NUM_PERFMUX_PER_INST: usize = 2;

    /// Static perfmux index of the router control aperture
    pub const RTR_PERFMUX_INDEX: usize = 0;

    /// Static perfmux index of the PMA aperture as addressed by the router
    pub const PMA_PERFMUX_INDEX: usize = 1;
}

/// MSS ISO/NISO hubs
#[cfg(feature = "mss-iso-niso-hubs")]
pub mod mss_iso_niso_hubs {
    pub const NUM_INSTANCES: usize = 1;
    pub const NUM_PERFMON_PER_INST: usize = 2;
    pub const NUM_PERFMUX_PER_INST: usize = 9;
}
