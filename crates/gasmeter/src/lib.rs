//! Upper-bound gas estimation for straight-line EVM assembly.
//!
//! The estimator walks a basic block item by item and reports, for each
//! instruction, a sound upper bound on the gas it can consume under a chosen
//! protocol version. A symbolic [`StateTracker`] supplies whatever operand
//! knowledge can be derived statically; anything it cannot resolve degrades
//! the bound towards [`GasBound::Unbounded`] instead of failing.
//!
//! # Example
//!
//! ```
//! use gasmeter::asm::{AsmItem, LabelId, OpCode};
//! use gasmeter::primitives::{SpecId, U256};
//! use gasmeter::{BlockState, GasBound, GasMeter};
//!
//! let mut meter = GasMeter::new(BlockState::new(), SpecId::BYZANTIUM);
//!
//! let block = [
//!     AsmItem::Push(U256::from(1u64)),
//!     AsmItem::Push(U256::from(64u64)),
//!     AsmItem::Op(OpCode::MSTORE),
//!     AsmItem::Label(LabelId::new(0)),
//! ];
//!
//! let mut total = GasBound::ZERO;
//! for item in &block {
//!     total += meter.estimate(item, true)?;
//! }
//!
//! assert_eq!(total, GasBound::from(7u64));
//! assert_eq!(meter.largest_memory_access(), U256::from(96u64));
//! # Ok::<(), gasmeter::EstimateError>(())
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod block_state;
pub mod bound;
pub mod calc;
pub mod constants;
pub mod meter;
pub mod state;

pub use block_state::BlockState;
pub use bound::GasBound;
pub use meter::{EstimateError, GasMeter};
pub use state::{StateTracker, ValueId};

pub use asm;
pub use primitives;
