use std::path::PathBuf;
use std::time::Duration;

/// Default delay between two checks of a hardware status condition
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Default number of re-checks after the first one before giving up
pub const DEFAULT_POLL_RETRIES: u32 = 1000;

/// Default physical memory device used to map apertures
pub const DEFAULT_DEVMEM_PATH: &str = "/dev/mem";

/// Cadence and budget for hardware status polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_POLL_RETRIES,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            max_retries,
        }
    }

    /// Longest time a single condition may be waited for
    pub fn budget(&self) -> Duration {
        self.interval * self.max_retries
    }

    /// Total checks of one condition: the first plus every retry
    ///
    /// Saturates at `u32::MAX` so the count never wraps.
    pub fn max_checks(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Route register accesses to in-memory fake registers
    pub fake_registers: bool,
    /// Device node apertures are mapped from
    pub devmem_path: PathBuf,
    pub poll: PollConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fake_registers: false,
            devmem_path: PathBuf::from(DEFAULT_DEVMEM_PATH),
            poll: PollConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Configuration for a session that never touches hardware
    pub fn simulated() -> Self {
        Self {
            fake_registers: true,
            ..Self::default()
        }
    }

    /// Use real registers when the memory device can be opened, fake ones otherwise
    pub fn auto_detect() -> Self {
        let config = Self::default();
        if Self::devmem_accessible(&config.devmem_path) {
            tracing::info!("Using registers mapped from {}", config.devmem_path.display());
            config
        } else {
            tracing::warn!(
                "Cannot open {}, falling back to fake registers",
                config.devmem_path.display()
            );
            Self {
                fake_registers: true,
                ..config
            }
        }
    }

    pub fn devmem_accessible(path: &std::path::Path) -> bool {
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_budget() {
        assert_eq!(PollConfig::default().budget(), Duration::from_millis(100));
    }

    #[test]
    fn test_max_checks_saturates() {
        assert_eq!(PollConfig::new(Duration::ZERO, 4).max_checks(), 5);
        assert_eq!(PollConfig::new(Duration::ZERO, u32::MAX - 1).max_checks(), u32::MAX);
        assert_eq!(PollConfig::new(Duration::ZERO, u32::MAX).max_checks(), u32::MAX);
    }

    #[test]
    fn test_simulated_config() {
        let config = SessionConfig::simulated();
        assert!(config.fake_registers);
        assert_eq!(config.devmem_path, PathBuf::from(DEFAULT_DEVMEM_PATH));
    }

    #[test]
    fn test_devmem_accessible_missing_path() {
        assert!(!SessionConfig::devmem_accessible(std::path::Path::new(
            "/nonexistent/mem"
        )));
    }
}
