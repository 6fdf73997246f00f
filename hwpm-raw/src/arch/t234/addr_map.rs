//! Physical address map of the T234 HWPM apertures

/// PMA aperture base
pub const PMA_BASE: u64 = 0x0F14_A000;

/// PMA aperture limit (inclusive)
pub const PMA_LIMIT: u64 = 0x0F14_BFFF;

/// Router aperture base
pub const RTR_BASE: u64 = 0x0F14_D000;

/// Router aperture limit (inclusive)
pub const RTR_LIMIT: u64 = 0x0F14_DFFF;

/// Base of the MSS ISO/NISO hub perfmon apertures
pub const MSS_HUB_PERFMON_BASE: u64 = 0x0F10_0000;

/// Base of the MSS ISO/NISO hub perfmux apertures
pub const MSS_HUB_PERFMUX_BASE: u64 = 0x0260_0000;

/// Stride between consecutive MSS hub perfmux apertures
pub const MSS_HUB_PERFMUX_STRIDE: u64 = 0x1_0000;

/// Size of a single perfmon aperture
pub const PERFMON_APERTURE_SIZE: u64 = 0x1000;

/// Size of a single perfmux aperture
pub const PERFMUX_APERTURE_SIZE: u64 = 0x1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pma_and_router_do_not_overlap() {
        assert!(PMA_LIMIT < RTR_BASE);
        assert_eq!(PMA_LIMIT - PMA_BASE + 1, 0x2000);
        assert_eq!(RTR_LIMIT - RTR_BASE + 1, 0x1000);
    }
}
