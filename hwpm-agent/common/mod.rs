pub mod fake;
pub mod mapper;
pub mod mmio;
pub mod soc;

pub use fake::FakeRegisters;
pub use mapper::{ApertureMapper, DevMemMapper, SimulatedMapper};
pub use mmio::MmioRegion;
pub use soc::{SocChip, ACTIVE_SOC};
