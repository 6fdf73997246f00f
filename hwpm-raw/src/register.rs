//! Generic register abstractions for type-safe field programming

/// A bit field inside a 32-bit register
///
/// Fields are described by their lowest bit and width, the same way the
/// hardware manuals list them (`31:24` is `Field::new(24, 8)`).
///
/// # Example
///
/// ```
/// use hwpm_raw::Field;
///
/// const STATUS: Field = Field::new(4, 3);
///
/// assert_eq!(STATUS.mask(), 0x70);
/// assert_eq!(STATUS.encode(0x2), 0x20);
/// assert_eq!(STATUS.decode(0xFFFF_FF2F), 0x2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub shift: u32,
    pub width: u32,
}

impl Field {
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// In-place mask of this field
    pub const fn mask(&self) -> u32 {
        (((1u64 << self.width) - 1) << self.shift) as u32
    }

    /// Shift `value` into position, dropping bits that do not fit
    pub const fn encode(&self, value: u32) -> u32 {
        ((value as u64) << self.shift) as u32 & self.mask()
    }

    /// Extract this field from a raw register value
    pub const fn decode(&self, reg: u32) -> u32 {
        (reg & self.mask()) >> self.shift
    }
}

/// Replace the bits selected by `mask` in `reg` with the matching bits of `value`
///
/// `value` is expected to be already shifted into position (e.g. built with
/// [`Field::encode`]); bits outside `mask` are ignored.
pub const fn set_field(reg: u32, mask: u32, value: u32) -> u32 {
    (reg & !mask) | (value & mask)
}

/// Trait for register layouts that can be converted to/from raw register values
///
/// This trait provides type-safe conversion between structured register
/// layouts and the raw 32-bit values read from or written to an aperture.
///
/// # Example
///
/// ```ignore
/// use hwpm_raw::register::RegisterLayout;
///
/// #[derive(Debug, Default)]
/// struct MyStatus {
///     busy: bool,
///     level: u8,
/// }
///
/// impl RegisterLayout for MyStatus {
///     fn to_raw(&self) -> u32 {
///         (if self.busy { 1 } else { 0 }) | ((self.level as u32) << 8)
///     }
///
///     fn from_raw(value: u32) -> Self {
///         Self {
///             busy: (value & 1) != 0,
///             level: ((value >> 8) & 0xFF) as u8,
///         }
///     }
/// }
/// ```
pub trait RegisterLayout: Sized {
    /// Convert this register layout to a raw register value
    fn to_raw(&self) -> u32;

    /// Parse a raw register value into this register layout
    fn from_raw(value: u32) -> Self;
}
