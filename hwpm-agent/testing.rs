// Test helpers: recording mapper and catalog builders

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{t234, Aperture, Chip, HwpmIp, IpId, MappedAperture};
use crate::common::{ApertureMapper, FakeRegisters, SimulatedMapper};
use crate::config::{PollConfig, SessionConfig};
use crate::error::{HwpmError, Result};
use crate::session::Hwpm;

pub const PERFMON_BASE: u64 = 0x0F10_0000;
pub const EXTRA_PERFMUX_BASE: u64 = 0x0F20_0000;

/// Physical addresses passed to map/unmap, in call order
#[derive(Debug, Default)]
pub struct MapLog {
    pub maps: Vec<u64>,
    pub unmaps: Vec<u64>,
}

#[derive(Default)]
pub struct RecordingMapper {
    log: Arc<Mutex<MapLog>>,
    fail_map: HashSet<u64>,
    fail_unmap: HashSet<u64>,
}

impl RecordingMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Arc<Mutex<MapLog>> {
        Arc::clone(&self.log)
    }

    pub fn fail_map_at(mut self, pa: u64) -> Self {
        self.fail_map.insert(pa);
        self
    }

    pub fn fail_unmap_at(mut self, pa: u64) -> Self {
        self.fail_unmap.insert(pa);
        self
    }
}

impl ApertureMapper for RecordingMapper {
    fn map(&self, aperture: &Aperture, fake_registers: bool) -> Result<MappedAperture> {
        if self.fail_map.contains(&aperture.start_abs_pa) {
            return Err(HwpmError::Mapping(format!(
                "injected map failure at 0x{:x}",
                aperture.start_abs_pa
            )));
        }
        self.log.lock().maps.push(aperture.start_abs_pa);
        SimulatedMapper.map(aperture, fake_registers)
    }

    fn unmap(&self, aperture: &Aperture, _mapped: &MappedAperture) -> Result<()> {
        if self.fail_unmap.contains(&aperture.start_abs_pa) {
            return Err(HwpmError::Mapping(format!(
                "injected unmap failure at 0x{:x}",
                aperture.start_abs_pa
            )));
        }
        self.log.lock().unmaps.push(aperture.start_abs_pa);
        Ok(())
    }
}

pub fn poll_config() -> PollConfig {
    PollConfig::new(Duration::ZERO, 3)
}

pub fn session_with(chip: Chip, mapper: RecordingMapper) -> (Hwpm, Arc<Mutex<MapLog>>) {
    let log = mapper.log();
    let config = SessionConfig {
        poll: poll_config(),
        ..SessionConfig::simulated()
    };
    (Hwpm::new(chip, &config, Box::new(mapper)), log)
}

pub fn session(chip: Chip) -> (Hwpm, Arc<Mutex<MapLog>>) {
    session_with(chip, RecordingMapper::new())
}

pub fn t234_session() -> (Hwpm, Arc<Mutex<MapLog>>) {
    session(t234::chip())
}

/// `count` 4 KiB apertures starting at `base`, instance bit `i` for entry `i`
pub fn apertures(name: &'static str, count: usize, base: u64) -> Vec<Aperture> {
    (0..count)
        .map(|i| {
            let start = base + i as u64 * 0x1000;
            Aperture::new(name, start, start + 0xFFF, 1 << i)
        })
        .collect()
}

/// A PMA whose slot 0 is the T234 PMA aperture, plus extra perfmuxes and `perfmons` perfmons
pub fn pma_with(perfmuxes: usize, perfmons: usize) -> HwpmIp {
    let mut muxes = t234::pma().static_perfmux(0).cloned().into_iter().collect::<Vec<_>>();
    for i in 1..perfmuxes {
        let start = EXTRA_PERFMUX_BASE + i as u64 * 0x1000;
        muxes.push(Aperture::new("pma_extra", start, start + 0xFFF, 1 << i));
    }

    HwpmIp::new(
        IpId::Pma,
        muxes,
        apertures("pma_perfmon", perfmons, PERFMON_BASE),
    )
}

pub fn perfmux_pa(slot: usize) -> u64 {
    EXTRA_PERFMUX_BASE + slot as u64 * 0x1000
}

pub fn perfmon_pa(index: usize) -> u64 {
    PERFMON_BASE + index as u64 * 0x1000
}

/// Fake register buffer behind a reserved aperture
pub fn fake(aperture: &Aperture) -> &FakeRegisters {
    aperture
        .mapped()
        .and_then(|mapped| mapped.fake.as_deref())
        .expect("aperture has no fake registers")
}
