//! Static description of the HWPM IP blocks on the active chip

pub mod aperture;
pub mod t234;

use std::collections::BTreeMap;

pub use aperture::{Aperture, ApertureState, MappedAperture, PaRange, Perfmon, Perfmux};

crate::ip_enum! {
    /// Identifier of an IP block in the chip catalog
    pub enum IpId {
        Pma => "PMA",
        Rtr => "RTR",
        MssIsoNisoHubs => "MSS_ISO_NISO_HUBS",
    }
}

/// One hardware aggregation unit and its perfmux/perfmon slots
///
/// Apertures are declared once in static arrays; the slot tables map each
/// slot index to a static entry, or to nothing when that instance is
/// floorswept.
#[derive(Debug, Clone)]
pub struct HwpmIp {
    pub id: IpId,
    perfmux_static: Vec<Perfmux>,
    perfmux_slots: Vec<Option<usize>>,
    perfmon_static: Vec<Perfmon>,
    perfmon_slots: Vec<Option<usize>>,
    /// Instance mask accumulated from reserved perfmuxes
    pub fs_mask: u32,
    /// Set once every present slot has completed its reserve step
    pub reserved: bool,
}

impl HwpmIp {
    /// Create an IP with every declared aperture present in its own slot
    pub fn new(id: IpId, perfmuxes: Vec<Perfmux>, perfmons: Vec<Perfmon>) -> Self {
        let perfmux_slots = (0..perfmuxes.len()).map(Some).collect();
        let perfmon_slots = (0..perfmons.len()).map(Some).collect();
        Self {
            id,
            perfmux_static: perfmuxes,
            perfmux_slots,
            perfmon_static: perfmons,
            perfmon_slots,
            fs_mask: 0,
            reserved: false,
        }
    }

    /// Mark perfmux slot `index` absent; the static entry stays declared
    pub fn floorsweep_perfmux(mut self, index: usize) -> Self {
        if let Some(slot) = self.perfmux_slots.get_mut(index) {
            *slot = None;
        }
        self
    }

    /// Mark perfmon slot `index` absent
    pub fn floorsweep_perfmon(mut self, index: usize) -> Self {
        if let Some(slot) = self.perfmon_slots.get_mut(index) {
            *slot = None;
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn num_perfmux_slots(&self) -> usize {
        self.perfmux_slots.len()
    }

    pub fn num_perfmon_slots(&self) -> usize {
        self.perfmon_slots.len()
    }

    pub fn perfmux(&self, slot: usize) -> Option<&Perfmux> {
        let idx = (*self.perfmux_slots.get(slot)?)?;
        self.perfmux_static.get(idx)
    }

    pub fn perfmux_mut(&mut self, slot: usize) -> Option<&mut Perfmux> {
        let idx = (*self.perfmux_slots.get(slot)?)?;
        self.perfmux_static.get_mut(idx)
    }

    pub fn perfmon(&self, slot: usize) -> Option<&Perfmon> {
        let idx = (*self.perfmon_slots.get(slot)?)?;
        self.perfmon_static.get(idx)
    }

    pub fn perfmon_mut(&mut self, slot: usize) -> Option<&mut Perfmon> {
        let idx = (*self.perfmon_slots.get(slot)?)?;
        self.perfmon_static.get_mut(idx)
    }

    /// Statically declared perfmux, reachable even if its slot is floorswept
    pub fn static_perfmux(&self, index: usize) -> Option<&Perfmux> {
        self.perfmux_static.get(index)
    }

    /// First perfmux slot; PMA has exactly one and RTR aliases it
    pub fn primary_perfmux(&self) -> Option<&Perfmux> {
        self.perfmux(0)
    }
}

/// Catalog of the IP blocks present on the active chip
#[derive(Debug, Clone, Default)]
pub struct Chip {
    pub name: &'static str,
    ips: BTreeMap<IpId, HwpmIp>,
}

impl Chip {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ips: BTreeMap::new(),
        }
    }

    pub fn with_ip(mut self, ip: HwpmIp) -> Self {
        self.ips.insert(ip.id, ip);
        self
    }

    pub fn ip(&self, id: IpId) -> Option<&HwpmIp> {
        self.ips.get(&id)
    }

    pub fn ip_mut(&mut self, id: IpId) -> Option<&mut HwpmIp> {
        self.ips.get_mut(&id)
    }
}
