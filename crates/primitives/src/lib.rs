//! # gasmeter-primitives
//!
//! Primitive types shared by the assembly and gas-estimation crates: the
//! protocol version ([`hardfork::SpecId`]), machine-level constants, and
//! re-exports of the `alloy` integer and map types used throughout.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod constants;
pub mod hardfork;

pub use alloy_primitives::{self, map, U256};
pub use constants::STACK_LIMIT;
pub use hardfork::SpecId;
