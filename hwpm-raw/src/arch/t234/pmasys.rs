//! PMASYS (performance-monitor aggregator) register definitions for T234
//!
//! Offsets are relative to the PMA aperture base
//! ([`super::addr_map::PMA_BASE`]).

use crate::register::RegisterLayout;

/// Second-level clock gating control
pub const CG2: u32 = 0x044;

pub mod cg2 {
    use crate::register::Field;

    pub const SLCG: Field = Field::new(0, 1);
    pub const SLCG_ENABLED: u32 = 0x0;
    pub const SLCG_DISABLED: u32 = 0x1;
}

/// Global control B (coalescing)
pub const CONTROLB: u32 = 0x070;

pub mod controlb {
    use crate::register::Field;

    pub const COALESCE_TIMEOUT_CYCLES: Field = Field::new(4, 3);
    pub const COALESCE_TIMEOUT_CYCLES_PROD: u32 = 0x4;
}

/// Per-channel user configuration
pub const fn channel_config_user(channel: u32) -> u32 {
    0x600 + channel * 0x20
}

pub mod channel_config_user {
    use crate::register::Field;

    pub const COALESCE_TIMEOUT_CYCLES: Field = Field::new(24, 3);
    pub const COALESCE_TIMEOUT_CYCLES_PROD: u32 = 0x4;
}

/// Per-channel trigger configuration
pub const fn trigger_config_user(channel: u32) -> u32 {
    0x680 + channel * 0x20
}

pub mod trigger_config_user {
    use crate::register::Field;

    pub const PMA_PULSE: Field = Field::new(0, 1);
    pub const PMA_PULSE_DISABLE: u32 = 0x0;
}

/// System trigger start mask
pub const SYS_TRIGGER_START_MASK: u32 = 0x700;

/// System trigger start mask (inverted polarity)
pub const SYS_TRIGGER_START_MASKB: u32 = 0x704;

/// System trigger stop mask
pub const SYS_TRIGGER_STOP_MASK: u32 = 0x708;

/// System trigger stop mask (inverted polarity)
pub const SYS_TRIGGER_STOP_MASKB: u32 = 0x70C;

/// All four trigger mask registers, in the order they are cleared
pub const SYS_TRIGGER_MASKS: [u32; 4] = [
    SYS_TRIGGER_START_MASK,
    SYS_TRIGGER_START_MASKB,
    SYS_TRIGGER_STOP_MASK,
    SYS_TRIGGER_STOP_MASKB,
];

/// PMA engine status
pub const ENGINESTATUS: u32 = 0x75C;

pub mod enginestatus {
    use crate::register::Field;

    pub const STATUS: Field = Field::new(0, 3);
    pub const STATUS_EMPTY: u32 = 0x0;
    pub const RBUFEMPTY: Field = Field::new(4, 1);
    pub const RBUFEMPTY_EMPTY: u32 = 0x1;


    /// Engine empty and record buffer drained
    pub const IDLE_VALUE: u32 = STATUS.encode(STATUS_EMPTY) | RBUFEMPTY.encode(RBUFEMPTY_EMPTY);
}

/// Decoded PMA engine status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PmaEngineStatus {
    /// Engine state machine status
    pub status: u32,
    /// Record buffer is empty
    pub rbuf_empty: bool,
}

impl PmaEngineStatus {
    pub fn is_idle(&self) -> bool {
        self.status == enginestatus::STATUS_EMPTY && self.rbuf_empty
    }
}

impl RegisterLayout for PmaEngineStatus {
    fn to_raw(&self) -> u32 {
        enginestatus::STATUS.encode(self.status)
            | enginestatus::RBUFEMPTY.encode(self.rbuf_empty as u32)
    }

    fn from_raw(value: u32) -> Self {
        Self {
            status: enginestatus::STATUS.decode(value),
            rbuf_empty: enginestatus::RBUFEMPTY.decode(value) == enginestatus::RBUFEMPTY_EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_encoding_matches_layout() {
        let idle = PmaEngineStatus {
            status: enginestatus::STATUS_EMPTY,
            rbuf_empty: true,
        };
        assert!(idle.is_idle());
        assert_eq!(idle.to_raw(), enginestatus::IDLE_VALUE);
    }

    #[test]
    fn test_busy_status_is_not_idle() {
        let status = PmaEngineStatus::from_raw(enginestatus::IDLE_VALUE | 0x2);
        assert_eq!(status.status, 0x2);
        assert!(status.rbuf_empty);
        assert!(!status.is_idle());
    }

    #[test]
    fn test_idle_ignores_bits_outside_fields() {
        assert!(PmaEngineStatus::from_raw(enginestatus::IDLE_VALUE | 0xFFFF_FF08).is_idle());
        assert!(!PmaEngineStatus::from_raw(0xFFFF_FF00).is_idle());
    }

    #[test]
    fn test_channel_registers_are_distinct() {
        assert_ne!(channel_config_user(0), trigger_config_user(0));
        assert_eq!(channel_config_user(1) - channel_config_user(0), 0x20);
    }
}
