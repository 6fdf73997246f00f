//! Chip-specific register definitions
//!
//! Each SoC generation places the HWPM blocks at different physical
//! addresses and may move registers or fields around. This module provides
//! chip-specific definitions organized by chip.
//!
//! ## Supported Chips
//!
//! - **T234** (`t234` feature)

#[cfg(feature = "t234")]
pub mod t234;
