//! Protocol version identifiers and their ordering.

#![allow(non_camel_case_types)]

pub use SpecId::*;

/// Specification IDs for the protocol milestones the gas schedule is gated
/// on, in upgrade order.
///
/// Account and storage access costs were repriced at [`TANGERINE`]; the
/// exponentiation per-byte cost was repriced at [`SPURIOUS_DRAGON`]. No other
/// cost in the schedule is version sensitive.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecId {
    /// Homestead, the baseline schedule.
    HOMESTEAD = 0,
    /// Tangerine Whistle, repricing IO-heavy account and storage access.
    TANGERINE = 1,
    /// Spurious Dragon, repricing the exponentiation byte cost.
    SPURIOUS_DRAGON = 2,
    /// Byzantium, the newest supported milestone.
    #[default]
    BYZANTIUM = 3,
}

impl SpecId {
    /// Returns the `SpecId` for the given `u8`.
    #[inline]
    pub const fn try_from_u8(spec_id: u8) -> Option<Self> {
        match spec_id {
            0 => Some(Self::HOMESTEAD),
            1 => Some(Self::TANGERINE),
            2 => Some(Self::SPURIOUS_DRAGON),
            3 => Some(Self::BYZANTIUM),
            _ => None,
        }
    }

    /// Returns `true` if the given specification ID is enabled in this spec.
    #[inline]
    pub const fn is_enabled_in(self, other: Self) -> bool {
        Self::enabled(self, other)
    }

    /// Returns `true` if the given specification ID is enabled in this spec.
    #[inline]
    pub const fn enabled(our: SpecId, other: SpecId) -> bool {
        our as u8 >= other as u8
    }
}

/// String identifiers for the milestones.
pub mod name {
    /// String identifier for [`super::HOMESTEAD`].
    pub const HOMESTEAD: &str = "Homestead";
    /// String identifier for [`super::TANGERINE`].
    pub const TANGERINE: &str = "Tangerine";
    /// String identifier for [`super::SPURIOUS_DRAGON`].
    pub const SPURIOUS_DRAGON: &str = "Spurious";
    /// String identifier for [`super::BYZANTIUM`].
    pub const BYZANTIUM: &str = "Byzantium";
}

impl From<SpecId> for &'static str {
    fn from(spec_id: SpecId) -> Self {
        match spec_id {
            SpecId::HOMESTEAD => name::HOMESTEAD,
            SpecId::TANGERINE => name::TANGERINE,
            SpecId::SPURIOUS_DRAGON => name::SPURIOUS_DRAGON,
            SpecId::BYZANTIUM => name::BYZANTIUM,
        }
    }
}

impl TryFrom<&str> for SpecId {
    type Error = UnknownHardfork;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name {
            name::HOMESTEAD => Ok(Self::HOMESTEAD),
            name::TANGERINE => Ok(Self::TANGERINE),
            name::SPURIOUS_DRAGON => Ok(Self::SPURIOUS_DRAGON),
            name::BYZANTIUM => Ok(Self::BYZANTIUM),
            _ => Err(UnknownHardfork),
        }
    }
}

/// String was not recognized as one of the named milestones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnknownHardfork;

impl core::fmt::Display for UnknownHardfork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown hardfork name")
    }
}

impl core::error::Error for UnknownHardfork {}
