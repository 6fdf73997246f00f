//! # hwpm-raw
//!
//! Register definitions for the SoC hardware performance monitoring (HWPM)
//! aggregation blocks.
//!
//! This crate provides the register offsets, field encodings and address map
//! of the central performance-monitor aggregator (PMA) and the router (RTR),
//! a generic 32-bit register access trait, and per-IP aperture descriptors
//! for the supported chips.
//!
//! ## Features
//!
//! Select the target chip via feature flags:
//! - `t234` (default) - T234 register definitions
//! - `mss-iso-niso-hubs` - include the MSS ISO/NISO hubs IP descriptor
//!
//! ## Usage
//!
//! ```ignore
//! use hwpm_raw::current_arch::pmasys;
//! use hwpm_raw::RegisterIo;
//!
//! // Disable the PMA pulse trigger on an already mapped aperture
//! aperture.update32(
//!     pmasys::trigger_config_user(0),
//!     pmasys::trigger_config_user::PMA_PULSE.mask(),
//!     pmasys::trigger_config_user::PMA_PULSE.encode(0),
//! )?;
//! ```

pub mod arch;
pub mod io;
pub mod register;

// Re-export for convenience
pub use io::{IoError, RegisterIo, Result};
pub use register::{set_field, Field, RegisterLayout};

// Export current chip based on feature flag
#[cfg(feature = "t234")]
pub use arch::t234 as current_arch;
