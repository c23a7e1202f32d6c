//! Gas amounts with an absorbing unbounded element.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use primitives::U256;

/// An upper bound on gas consumption.
///
/// Estimated costs are added up with saturating semantics: once a component
/// is [`Unbounded`](Self::Unbounded), or a finite sum no longer fits in a
/// [`U256`], the total stays unbounded. The derived ordering places every
/// finite amount below [`Unbounded`](Self::Unbounded), so `max` picks the
/// more pessimistic of two bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GasBound {
    /// A known finite amount of gas.
    Finite(U256),
    /// No finite bound can be given.
    Unbounded,
}

impl GasBound {
    /// Zero gas.
    pub const ZERO: Self = Self::Finite(U256::ZERO);

    /// Returns `true` if no finite bound is known.
    #[inline]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Returns the finite amount, or `None` if unbounded.
    #[inline]
    pub const fn finite(self) -> Option<U256> {
        match self {
            Self::Finite(amount) => Some(amount),
            Self::Unbounded => None,
        }
    }
}

impl Default for GasBound {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for GasBound {
    #[inline]
    fn from(amount: u64) -> Self {
        Self::Finite(U256::from(amount))
    }
}

impl From<U256> for GasBound {
    #[inline]
    fn from(amount: U256) -> Self {
        Self::Finite(amount)
    }
}

impl Add for GasBound {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Finite(lhs), Self::Finite(rhs)) => match lhs.checked_add(rhs) {
                Some(sum) => Self::Finite(sum),
                None => Self::Unbounded,
            },
            _ => Self::Unbounded,
        }
    }
}

impl Add<u64> for GasBound {
    type Output = Self;

    #[inline]
    fn add(self, rhs: u64) -> Self {
        self + Self::from(rhs)
    }
}

impl AddAssign for GasBound {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<u64> for GasBound {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        *self = *self + rhs;
    }
}

impl Sum for GasBound {
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for GasBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(amount) => amount.fmt(f),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}
