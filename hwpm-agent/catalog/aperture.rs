//! Perfmux and perfmon apertures and their reservation sub-state

use std::sync::Arc;

use hwpm_raw::RegisterIo;

use crate::common::{FakeRegisters, MmioRegion};

/// Physical address range `start..=end`; all-zero means "not populated"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaRange {
    pub start: u64,
    pub end: u64,
}

impl PaRange {
    pub const EMPTY: PaRange = PaRange { start: 0, end: 0 };

    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

/// Register backends available for an aperture while it is reserved
///
/// Cloning shares the underlying mapping; it never maps anything again.
#[derive(Debug, Clone, Default)]
pub struct MappedAperture {
    pub mmio: Option<Arc<MmioRegion>>,
    pub fake: Option<Arc<FakeRegisters>>,
}

impl MappedAperture {
    pub fn simulated(fake: FakeRegisters) -> Self {
        Self {
            mmio: None,
            fake: Some(Arc::new(fake)),
        }
    }

    /// Backend to use for register accesses in the given mode
    pub fn io(&self, fake_registers: bool) -> Option<&dyn RegisterIo> {
        if fake_registers {
            self.fake.as_deref().map(|f| f as &dyn RegisterIo)
        } else {
            self.mmio.as_deref().map(|m| m as &dyn RegisterIo)
        }
    }

    /// Whether `self` and `other` are backed by the very same mapping
    pub fn shares_with(&self, other: &MappedAperture) -> bool {
        let same_mmio = match (&self.mmio, &other.mmio) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        let same_fake = match (&self.fake, &other.fake) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_mmio && same_fake
    }
}

/// Reservation sub-state of an aperture
#[derive(Debug, Clone, Default)]
pub enum ApertureState {
    #[default]
    Unreserved,
    /// Mapped by this aperture's own reserve step; released through the mapper
    Owned(MappedAperture),
    /// Borrowed from the aperture at `owner_pa`; never mapped or unmapped here
    Aliased {
        owner_pa: u64,
        mapped: MappedAperture,
    },
}

/// One memory-mapped register window bound to a physical monitor instance
///
/// Perfmuxes and perfmons share this representation; only perfmuxes take
/// part in aliasing.
#[derive(Debug, Clone)]
pub struct Aperture {
    pub name: &'static str,
    /// Floorsweep bit(s) this aperture contributes to its IP while reserved
    pub hw_inst_mask: u32,
    /// Absolute physical base; identifies the hardware independent of mapping
    pub start_abs_pa: u64,
    /// Absolute physical limit (inclusive)
    pub end_abs_pa: u64,
    range: PaRange,
    state: ApertureState,
}

pub type Perfmux = Aperture;
pub type Perfmon = Aperture;

impl Aperture {
    pub fn new(name: &'static str, start_abs_pa: u64, end_abs_pa: u64, hw_inst_mask: u32) -> Self {
        Self {
            name,
            hw_inst_mask,
            start_abs_pa,
            end_abs_pa,
            range: PaRange::EMPTY,
            state: ApertureState::Unreserved,
        }
    }

    /// Size of the aperture in bytes
    pub fn size(&self) -> usize {
        (self.end_abs_pa - self.start_abs_pa + 1) as usize
    }

    pub fn range(&self) -> PaRange {
        self.range
    }

    pub fn state(&self) -> &ApertureState {
        &self.state
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self.state, ApertureState::Unreserved)
    }

    pub fn is_aliased(&self) -> bool {
        matches!(self.state, ApertureState::Aliased { .. })
    }

    pub fn mapped(&self) -> Option<&MappedAperture> {
        match &self.state {
            ApertureState::Unreserved => None,
            ApertureState::Owned(mapped) => Some(mapped),
            ApertureState::Aliased { mapped, .. } => Some(mapped),
        }
    }

    /// Mapping created by this aperture's own reserve step
    pub fn owned(&self) -> Option<&MappedAperture> {
        match &self.state {
            ApertureState::Owned(mapped) => Some(mapped),
            _ => None,
        }
    }

    pub(crate) fn set_owned(&mut self, mapped: MappedAperture) {
        self.range = PaRange::new(self.start_abs_pa, self.end_abs_pa);
        self.state = ApertureState::Owned(mapped);
    }

    /// Detach an owned mapping, leaving the aperture unreserved
    ///
    /// Aliased and unreserved apertures are left untouched and yield `None`.
    pub(crate) fn take_owned(&mut self) -> Option<MappedAperture> {
        if !matches!(self.state, ApertureState::Owned(_)) {
            return None;
        }
        self.range = PaRange::EMPTY;
        match std::mem::take(&mut self.state) {
            ApertureState::Owned(mapped) => Some(mapped),
            _ => None,
        }
    }

    pub(crate) fn set_aliased(&mut self, owner_pa: u64, range: PaRange, mapped: MappedAperture) {
        self.range = range;
        self.state = ApertureState::Aliased { owner_pa, mapped };
    }

    /// Drop a borrowed mapping; owned state is never touched here
    pub(crate) fn clear_alias(&mut self) {
        if self.is_aliased() {
            self.range = PaRange::EMPTY;
            self.state = ApertureState::Unreserved;
        }
    }
}
