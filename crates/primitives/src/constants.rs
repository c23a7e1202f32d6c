//! Machine-level constants.

/// EVM interpreter stack limit.
///
/// No operand reference can be deeper than this many slots below the top of
/// the stack.
pub const STACK_LIMIT: usize = 1024;
