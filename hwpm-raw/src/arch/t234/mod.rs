//! T234 HWPM register definitions
//!
//! ## Blocks
//!
//! - **PMASYS** - central performance-monitor aggregator (PMA): triggers,
//!   channels, engine status and clock gating
//! - **PMMSYS SYS0ROUTER** - router (RTR) that fans triggers out to the
//!   perfmons and merges their status back
//!
//! All register offsets are byte offsets relative to the start of the
//! aperture that contains them, not absolute physical addresses.

pub mod addr_map;
pub mod ip;
pub mod pmasys;
pub mod pmmsys;
