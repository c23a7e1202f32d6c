//! Gas schedule constants.
//!
//! Instruction costs that depend on the protocol version live in
//! [`calc`](crate::calc) as functions over [`SpecId`](primitives::SpecId);
//! everything here is version independent.

/// Gas cost of the `Zero` tier instructions.
pub const ZERO: u64 = 0;
/// Gas cost of the `Base` tier instructions.
pub const BASE: u64 = 1;
/// Gas cost of the `VeryLow` tier instructions.
pub const VERYLOW: u64 = 1;
/// Gas cost of the `Low` tier instructions.
pub const LOW: u64 = 2;
/// Gas cost of the `Mid` tier instructions.
pub const MID: u64 = 3;
/// Gas cost of the `High` tier instructions.
pub const HIGH: u64 = 4;
/// Gas cost of the `Ext` tier instructions that are not repriced by a
/// protocol version.
pub const EXT: u64 = 7;

/// Gas cost of a `JUMPDEST`, priced individually rather than by tier.
pub const JUMPDEST: u64 = 1;
/// Base gas cost of an `EXP`.
pub const EXP: u64 = 2;
/// Base gas cost of a `KECCAK256`.
pub const KECCAK256: u64 = 4;
/// Gas cost per 32-byte word hashed by `KECCAK256`.
pub const KECCAK256WORD: u64 = 1;
/// Gas cost of an `SSTORE` that may write a nonzero value into a zero slot.
pub const SSTORE_SET: u64 = 1250;
/// Gas cost of an `SSTORE` that cannot be a zero-to-nonzero transition.
pub const SSTORE_RESET: u64 = 310;
/// Refund granted when an `SSTORE` clears a slot. Refunds only ever lower
/// the final transaction cost, so the estimator never subtracts them.
pub const REFUND_SSTORE_CLEARS: i64 = 950;
/// Base gas cost of a `LOG*`.
pub const LOG: u64 = 24;
/// Gas cost per 32-byte word of `LOG*` payload.
pub const LOGDATA: u64 = 1;
/// Gas cost per `LOG*` topic.
pub const LOGTOPIC: u64 = 24;
/// Base gas cost of a `CREATE` or `CREATE2`.
pub const CREATE: u64 = 2000;
/// Gas cost per 32-byte word of deployed code.
pub const CODEDEPOSIT: u64 = 12;
/// Gas handed to the callee of a value-bearing call on top of the forwarded
/// amount.
pub const CALL_STIPEND: u64 = 1000;
/// Gas surcharge for a call that transfers value.
pub const CALLVALUE: u64 = 550;
/// Gas surcharge for a `CALL` that may touch a fresh account.
pub const NEWACCOUNT: u64 = 1600;
/// Refund granted by a `SELFDESTRUCT`. Never subtracted, same as
/// [`REFUND_SSTORE_CLEARS`].
pub const SELFDESTRUCT_REFUND: i64 = 1500;

/// Linear gas cost per 32-byte word of touched memory.
pub const MEMORY: u64 = 1;
/// Divisor of the quadratic part of the memory cost.
pub const MEMORY_QUADRATIC_DIVISOR: u64 = 1024;
/// Gas cost per 32-byte word moved by a copying instruction.
pub const COPY: u64 = 1;

/// Base gas cost of a message-call transaction. Charged once per
/// transaction, never per instruction.
pub const TRANSACTION: u64 = 25000;
/// Base gas cost of a contract-creation transaction.
pub const TRANSACTION_CREATE: u64 = 20000;
/// Gas cost per zero byte of transaction payload.
pub const TRANSACTION_ZERO_DATA: u64 = 1;
/// Gas cost per nonzero byte of transaction payload.
pub const TRANSACTION_NON_ZERO_DATA: u64 = 4;
