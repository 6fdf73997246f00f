use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HwpmError {
    #[error("Ordering violation: {0}")]
    OrderingViolation(String),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("{ip} {kind} {index} {op} failed: {source}")]
    SubResource {
        ip: &'static str,
        kind: &'static str,
        index: usize,
        op: &'static str,
        #[source]
        source: Box<HwpmError>,
    },

    #[error("Timed out after {attempts} attempts waiting for {condition}")]
    HardwareTimeout {
        condition: &'static str,
        attempts: u32,
    },

    #[error("Aperture mapping failed: {0}")]
    Mapping(String),

    #[error("Register access failed: {0}")]
    Register(#[from] hwpm_raw::IoError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Nix error: {0}")]
    NixError(#[from] nix::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported chip: {0}")]
    UnsupportedChip(String),
}

impl HwpmError {
    /// Negative errno equivalent, for callers that report integer status codes
    pub fn errno(&self) -> i32 {
        match self {
            HwpmError::OrderingViolation(_) | HwpmError::ConfigError(_) => -libc::EINVAL,
            HwpmError::ResourceUnavailable(_) | HwpmError::UnsupportedChip(_) => -libc::ENODEV,
            HwpmError::SubResource { source, .. } => source.errno(),
            HwpmError::HardwareTimeout { .. } | HwpmError::Register(_) => -libc::EIO,
            HwpmError::Mapping(_) => -libc::ENOMEM,
            HwpmError::IoError(e) => -e.raw_os_error().unwrap_or(libc::EIO),
            HwpmError::NixError(e) => -(*e as i32),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HwpmError::HardwareTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, HwpmError>;
