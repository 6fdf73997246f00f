//! PMMSYS SYS0ROUTER register definitions for T234
//!
//! Offsets are relative to the router aperture base
//! ([`super::addr_map::RTR_BASE`]).

use crate::register::RegisterLayout;

/// Merged status of every perfmon behind the router
pub const SYS0ROUTER_PERFMONSTATUS: u32 = 0x0A0;

pub mod sys0router_perfmonstatus {
    use crate::register::Field;

    /// Non-zero while any perfmon still has traffic in flight
    pub const MERGED: Field = Field::new(0, 1);
    pub const MERGED_EMPTY: u32 = 0x0;
}

/// Router engine status
pub const SYS0ROUTER_ENGINESTATUS: u32 = 0x0B0;

pub mod sys0router_enginestatus {
    use crate::register::Field;

    pub const STATUS: Field = Field::new(0, 3);
    pub const STATUS_EMPTY: u32 = 0x0;
}

/// Router second-level clock gating control
pub const SYS0ROUTER_CG2: u32 = 0x0C0;

pub mod sys0router_cg2 {
    use crate::register::Field;

    pub const SLCG_PERFMON: Field = Field::new(0, 1);
    pub const SLCG_PERFMON_DISABLED: u32 = 0x1;
    pub const SLCG_PERFMON_PROD: u32 = 0x0;

    pub const SLCG_ROUTER: Field = Field::new(1, 1);
    pub const SLCG_ROUTER_DISABLED: u32 = 0x1;
    pub const SLCG_ROUTER_PROD: u32 = 0x0;

    pub const SLCG: Field = Field::new(2, 1);
    pub const SLCG_DISABLED: u32 = 0x1;
    pub const SLCG_PROD: u32 = 0x0;

    /// Perfmon, router and block level gating fields together
    pub const SLCG_MASK: u32 = SLCG_PERFMON.mask() | SLCG_ROUTER.mask() | SLCG.mask();

    pub const SLCG_ALL_DISABLED: u32 = SLCG_PERFMON.encode(SLCG_PERFMON_DISABLED)
        | SLCG_ROUTER.encode(SLCG_ROUTER_DISABLED)
        | SLCG.encode(SLCG_DISABLED);

    pub const SLCG_ALL_PROD: u32 = SLCG_PERFMON.encode(SLCG_PERFMON_PROD)
        | SLCG_ROUTER.encode(SLCG_ROUTER_PROD)
        | SLCG.encode(SLCG_PROD);
}

/// Decoded router engine status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterEngineStatus {
    pub status: u32,
}

impl RouterEngineStatus {
    pub fn is_empty(&self) -> bool {
        self.status == sys0router_enginestatus::STATUS_EMPTY
    }
}

impl RegisterLayout for RouterEngineStatus {
    fn to_raw(&self) -> u32 {
        sys0router_enginestatus::STATUS.encode(self.status)
    }

    fn from_raw(value: u32) -> Self {
        Self {
            status: sys0router_enginestatus::STATUS.decode(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slcg_encodings_cover_mask() {
        assert_eq!(sys0router_cg2::SLCG_MASK, 0x7);
        assert_eq!(sys0router_cg2::SLCG_ALL_DISABLED, 0x7);
        assert_eq!(sys0router_cg2::SLCG_ALL_PROD, 0x0);
    }

    #[test]
    fn test_router_engine_status_decode() {
        assert!(RouterEngineStatus::from_raw(0xFFFF_FFF8).is_empty());
        assert!(!RouterEngineStatus::from_raw(0x1).is_empty());
    }
}
