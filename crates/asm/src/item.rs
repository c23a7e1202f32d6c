//! Items of a straight-line assembly sequence.

use crate::OpCode;
use primitives::U256;

/// Byte width of an assembled label address.
///
/// Label pushes assemble as a fixed-width push so that label addresses can be
/// filled in after layout without shifting code.
pub const LABEL_WIDTH: usize = 2;

/// Identifier of a jump label within one assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LabelId(u32);

impl LabelId {
    /// Instantiates a new label identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the label identifier as a u32.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// One item of a straight-line assembly sequence.
///
/// Items are what the compiler backend works on before layout: executable
/// instructions, immediate constant pushes, and labels that only turn into
/// concrete code offsets once the assembly is linked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmItem {
    /// An executable instruction.
    Op(OpCode),
    /// A push of an immediate constant value.
    Push(U256),
    /// A push of a code label whose address is not yet resolved.
    PushLabel(LabelId),
    /// A jump-target marker. Assembles to a single `JUMPDEST`.
    Label(LabelId),
}

impl AsmItem {
    /// Returns the byte length of this item once assembled.
    ///
    /// Constant pushes use the shortest push able to hold the value (a zero
    /// value still needs a one-byte immediate); label pushes assemble with a
    /// [`LABEL_WIDTH`] immediate.
    pub fn assembled_size(&self) -> usize {
        match self {
            Self::Op(op) => 1 + op.info().immediate_size() as usize,
            Self::Push(value) => 1 + core::cmp::max(1, value.byte_len()),
            Self::PushLabel(_) => 1 + LABEL_WIDTH,
            Self::Label(_) => 1,
        }
    }
}

impl From<OpCode> for AsmItem {
    #[inline]
    fn from(op: OpCode) -> Self {
        Self::Op(op)
    }
}

impl From<U256> for AsmItem {
    #[inline]
    fn from(value: U256) -> Self {
        Self::Push(value)
    }
}
