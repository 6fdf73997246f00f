// SoC detection and configuration

use once_cell::sync::Lazy;

use crate::error::{HwpmError, Result};

const SOC_ID_PATH: &str = "/sys/devices/soc0/soc_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocChip {
    T234,
    Unknown,
}

impl SocChip {
    pub fn name(&self) -> &'static str {
        match self {
            SocChip::T234 => "T234",
            SocChip::Unknown => "Unknown",
        }
    }

    /// Map the chip id reported by the SoC info driver
    pub fn from_soc_id(id: u32) -> Self {
        match id {
            0x23 => SocChip::T234,
            _ => SocChip::Unknown,
        }
    }
}

pub static ACTIVE_SOC: Lazy<SocChip> =
    Lazy::new(|| detect_soc().unwrap_or(SocChip::Unknown));

fn detect_soc() -> Result<SocChip> {
    let raw = std::fs::read_to_string(SOC_ID_PATH)?;
    let id = parse_soc_id(&raw)?;
    let chip = SocChip::from_soc_id(id);

    tracing::info!("SoC id 0x{:x} ({})", id, chip.name());

    Ok(chip)
}

fn parse_soc_id(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    parsed.map_err(|e| HwpmError::ConfigError(format!("Invalid soc_id {raw:?}: {e}")))
}
