// Macros (must be first for visibility)
#[macro_use]
pub mod macros;

pub mod catalog;
pub mod common;
pub mod config;
pub mod error;
pub mod preset;
pub mod quiesce;
pub mod reservation;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{Chip, HwpmIp, IpId};
pub use config::{PollConfig, SessionConfig};
pub use error::{HwpmError, Result};
pub use preset::{disable_slcg, enable_slcg, init_prod_values};
pub use quiesce::disable_triggers;
pub use reservation::{release_pma, release_rtr, reserve_pma, reserve_rtr};
pub use session::Hwpm;
