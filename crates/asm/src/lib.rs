//! # gasmeter-asm
//!
//! The instruction set and assembly-item model consumed by the gas
//! estimation crates: an [`OpCode`] wrapper with a 256-entry metadata
//! jumptable (stack arity, immediate width, gas tier) and the [`AsmItem`]
//! variants a straight-line assembly sequence is made of.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod item;
pub mod opcode;

pub use item::{AsmItem, LabelId, LABEL_WIDTH};
pub use opcode::{OpCode, OpCodeInfo, Tier, OPCODE_INFO_JUMPTABLE};
