//! The symbolic machine state the estimator reads its operand knowledge from.

use asm::AsmItem;
use auto_impl::auto_impl;
use primitives::U256;

/// Opaque reference to one symbolic value held by a [`StateTracker`].
///
/// References are minted by the tracker and stay valid for its lifetime; two
/// equal references denote the same value. Holders never interpret the inner
/// index, they only hand it back to the tracker's resolution queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ValueId(usize);

impl ValueId {
    /// Instantiates a new value reference. Only trackers mint these.
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the reference as an index.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Symbolic state of the machine at a single point of a straight-line block.
///
/// The estimator reads operands through the resolution queries, then moves
/// the state past the current item with exactly one
/// [`advance`](StateTracker::advance) call. Queries are answered for the
/// state *before* that item executes.
///
/// Pessimism is always sound: a tracker that answers every resolution query
/// with "unknown" yields coarser but still valid upper bounds.
#[auto_impl(&mut, Box)]
pub trait StateTracker {
    /// Resolves a value reference to a statically known constant.
    fn known_constant(&self, value: ValueId) -> Option<U256>;

    /// Returns a reference to the stack element `depth` slots below the top,
    /// with 0 denoting the top itself.
    ///
    /// Elements below everything the current block has pushed belong to the
    /// surrounding code; they resolve as unknown values.
    fn stack_element(&mut self, depth: usize) -> ValueId;

    /// Returns the tracked content of the storage slot referenced by `slot`,
    /// if the tracker knows what the slot holds.
    fn storage_value(&mut self, slot: ValueId) -> Option<ValueId>;

    /// Advances the state by the effect of `item`.
    fn advance(&mut self, item: &AsmItem);

    /// Number of items applied so far via [`advance`](StateTracker::advance).
    ///
    /// Strictly increases by one per applied item; the estimator uses it to
    /// detect a tracker that moved out from under it.
    fn position(&self) -> u64;
}
