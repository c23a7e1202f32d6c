//! The per-block gas estimator.

use crate::{
    calc, constants,
    state::{StateTracker, ValueId},
    GasBound,
};
use asm::{opcode, AsmItem, OpCode};
use core::fmt;
use primitives::{SpecId, U256};

/// Misuse of a [`GasMeter`]: the state tracker moved outside the meter.
///
/// Estimation itself has no error channel; costs that cannot be resolved are
/// [`GasBound::Unbounded`], never failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EstimateError {
    /// The tracker was advanced out of estimation order.
    ///
    /// A meter must see every item of its block in execution order, and
    /// nothing else may advance the tracker in between.
    OutOfOrder {
        /// Tracker position the meter expected.
        expected: u64,
        /// Tracker position actually found.
        found: u64,
    },
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { expected, found } => write!(
                f,
                "state tracker advanced out of order: expected position {expected}, found {found}"
            ),
        }
    }
}

impl core::error::Error for EstimateError {}

/// Upper-bound gas estimator for one straight-line assembly block.
///
/// A meter is bound to one state tracker and one protocol version. Items are
/// fed in execution order through [`estimate`](Self::estimate); every call
/// prices the item against the tracker's pre-state and then advances the
/// tracker past it. Construct a fresh meter, over a fresh or forked tracker,
/// for every control-flow branch.
///
/// The reported bound covers worst-case execution: refunds are ignored and
/// statically unresolvable costs saturate to [`GasBound::Unbounded`].
#[derive(Clone, Debug)]
pub struct GasMeter<S> {
    state: S,
    spec_id: SpecId,
    largest_memory_access: U256,
    origin: u64,
    fed: u64,
}

impl<S: StateTracker> GasMeter<S> {
    /// Creates a meter over `state` with no memory paid for yet.
    pub fn new(state: S, spec_id: SpecId) -> Self {
        Self::new_with_memory(state, spec_id, U256::ZERO)
    }

    /// Creates a meter resuming a block whose preceding code already paid
    /// for memory up to `largest_memory_access` bytes.
    pub fn new_with_memory(state: S, spec_id: SpecId, largest_memory_access: U256) -> Self {
        let origin = state.position();
        Self { state, spec_id, largest_memory_access, origin, fed: 0 }
    }

    /// Protocol version the schedule is evaluated at.
    pub const fn spec_id(&self) -> SpecId {
        self.spec_id
    }

    /// Largest memory end offset charged for so far, in bytes.
    ///
    /// Never decreases over the meter's lifetime.
    pub const fn largest_memory_access(&self) -> U256 {
        self.largest_memory_access
    }

    /// Returns a reference to the underlying state tracker.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Returns a mutable reference to the underlying state tracker.
    ///
    /// Advancing the tracker through this reference desynchronizes the
    /// meter; the next [`estimate`](Self::estimate) call reports it.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consumes the meter and returns the tracker, advanced past every
    /// estimated item.
    pub fn into_state(self) -> S {
        self.state
    }

    /// Returns an upper bound on the gas consumed by `item` and advances the
    /// tracker past it.
    ///
    /// With `include_external_costs`, gas spent inside called or created
    /// contracts is folded in; since those executions have no static bound,
    /// call and create instructions then estimate as unbounded. Without it,
    /// the estimate covers only cost incurred in the current frame.
    pub fn estimate(
        &mut self,
        item: &AsmItem,
        include_external_costs: bool,
    ) -> Result<GasBound, EstimateError> {
        let expected = self.origin + self.fed;
        let found = self.state.position();
        if found != expected {
            return Err(EstimateError::OutOfOrder { expected, found });
        }

        let gas = self.item_gas(item, include_external_costs);
        self.state.advance(item);
        self.fed += 1;
        Ok(gas)
    }

    fn item_gas(&mut self, item: &AsmItem, include_external_costs: bool) -> GasBound {
        match item {
            AsmItem::Push(_) | AsmItem::PushLabel(_) => calc::tier_cost(OpCode::PUSH1).into(),
            AsmItem::Label(_) => calc::tier_cost(OpCode::JUMPDEST).into(),
            AsmItem::Op(op) => self.op_gas(*op, include_external_costs),
        }
    }

    fn op_gas(&mut self, op: OpCode, include_external_costs: bool) -> GasBound {
        match op.get() {
            opcode::SLOAD => calc::sload_cost(self.spec_id).into(),
            opcode::BALANCE => calc::balance_cost(self.spec_id).into(),
            opcode::EXTCODESIZE | opcode::EXTCODEHASH => calc::extcode_cost(self.spec_id).into(),
            opcode::SELFDESTRUCT => calc::selfdestruct_cost(self.spec_id).into(),
            opcode::EXP => self.exp_gas(),
            opcode::KECCAK256 => {
                let mut gas = GasBound::from(constants::KECCAK256);
                gas += self.memory_gas_region(0, 1);
                gas += self.word_gas(constants::KECCAK256WORD, 1);
                gas
            }
            opcode::CALLDATACOPY | opcode::CODECOPY | opcode::RETURNDATACOPY => {
                let mut gas = GasBound::from(calc::tier_cost(op));
                gas += self.memory_gas_region(0, 2);
                gas += self.word_gas(constants::COPY, 2);
                gas
            }
            opcode::EXTCODECOPY => {
                let mut gas = GasBound::from(calc::extcode_cost(self.spec_id));
                gas += self.memory_gas_region(1, 3);
                gas += self.word_gas(constants::COPY, 3);
                gas
            }
            opcode::MLOAD | opcode::MSTORE => {
                let mut gas = GasBound::from(calc::tier_cost(op));
                gas += self.memory_gas_at(0, 32);
                gas
            }
            opcode::MSTORE8 => {
                let mut gas = GasBound::from(calc::tier_cost(op));
                gas += self.memory_gas_at(0, 1);
                gas
            }
            opcode::RETURN | opcode::REVERT => {
                let mut gas = GasBound::from(calc::tier_cost(op));
                gas += self.memory_gas_region(0, 1);
                gas
            }
            opcode::LOG0..=opcode::LOG4 => {
                let topics = (op.get() - opcode::LOG0) as u64;
                let mut gas = GasBound::from(constants::LOG) + constants::LOGTOPIC * topics;
                gas += self.memory_gas_region(0, 1);
                gas += self.word_gas(constants::LOGDATA, 1);
                gas
            }
            opcode::SSTORE => self.sstore_gas(),
            opcode::CREATE | opcode::CREATE2 => self.create_gas(op, include_external_costs),
            opcode::CALL | opcode::CALLCODE | opcode::DELEGATECALL | opcode::STATICCALL => {
                self.call_gas(op, include_external_costs)
            }
            _ => calc::tier_cost(op).into(),
        }
    }

    fn exp_gas(&mut self) -> GasBound {
        match self.stack_constant(1) {
            Some(power) => calc::exp_cost(self.spec_id, power).into(),
            None => GasBound::Unbounded,
        }
    }

    fn sstore_gas(&mut self) -> GasBound {
        let slot = self.state.stack_element(0);
        let new_value = self.stack_constant(1);
        // Writing a zero, or overwriting a slot whose tracked content is
        // known nonzero, can never be the zero-to-nonzero transition.
        let is_reset = new_value.is_some_and(|value| value.is_zero())
            || self
                .prior_storage_constant(slot)
                .is_some_and(|prior| !prior.is_zero());
        if is_reset {
            constants::SSTORE_RESET.into()
        } else {
            constants::SSTORE_SET.into()
        }
    }

    fn create_gas(&mut self, op: OpCode, include_external_costs: bool) -> GasBound {
        let mut gas = GasBound::from(constants::CREATE);
        gas += self.memory_gas_region(1, 2);
        gas += self.word_gas(constants::CODEDEPOSIT, 2);
        if op.get() == opcode::CREATE2 {
            // The init code is additionally hashed to derive the address.
            gas += self.word_gas(constants::KECCAK256WORD, 2);
        }
        if include_external_costs {
            // The constructor's execution has no static bound.
            gas += GasBound::Unbounded;
        }
        gas
    }

    fn call_gas(&mut self, op: OpCode, include_external_costs: bool) -> GasBound {
        let mut gas = GasBound::from(calc::call_cost(self.spec_id));
        if op.get() == opcode::CALL {
            // We very rarely know statically whether the target account
            // already exists.
            gas += constants::NEWACCOUNT;
        }
        // DELEGATECALL and STATICCALL carry no value operand.
        let value_size = match op.get() {
            opcode::DELEGATECALL | opcode::STATICCALL => 0,
            _ => 1,
        };
        if value_size == 1 && !self.stack_constant(2).is_some_and(|value| value.is_zero()) {
            gas += constants::CALLVALUE;
        }
        gas += self.memory_gas_region(2 + value_size, 3 + value_size);
        gas += self.memory_gas_region(4 + value_size, 5 + value_size);
        if include_external_costs {
            // Stipend handed to the callee, plus its execution, which cannot
            // be bounded without knowing the target.
            gas += constants::CALL_STIPEND;
            gas += GasBound::Unbounded;
        }
        gas
    }

    /// Resolves a stack operand to a statically known constant.
    fn stack_constant(&mut self, depth: usize) -> Option<U256> {
        let id = self.state.stack_element(depth);
        self.state.known_constant(id)
    }

    fn prior_storage_constant(&mut self, slot: ValueId) -> Option<U256> {
        let value = self.state.storage_value(slot)?;
        self.state.known_constant(value)
    }

    /// Charges `rate` gas per 32-byte word of the buffer whose size operand
    /// is referenced at `size_depth`.
    fn word_gas(&mut self, rate: u64, size_depth: usize) -> GasBound {
        let Some(size) = self.stack_constant(size_depth) else {
            return GasBound::Unbounded;
        };
        match calc::cost_per_word(size, rate) {
            Some(gas) => GasBound::Finite(gas),
            None => GasBound::Unbounded,
        }
    }

    /// Charges memory expansion for a `width`-byte access at the offset
    /// referenced at `offset_depth`.
    fn memory_gas_at(&mut self, offset_depth: usize, width: u64) -> GasBound {
        let Some(offset) = self.stack_constant(offset_depth) else {
            return GasBound::Unbounded;
        };
        match offset.checked_add(U256::from(width)) {
            Some(end) => self.grow_memory(end),
            None => GasBound::Unbounded,
        }
    }

    /// Charges memory expansion for the region described by the offset and
    /// size operands at the given stack depths.
    fn memory_gas_region(&mut self, offset_depth: usize, size_depth: usize) -> GasBound {
        let size = self.stack_constant(size_depth);
        // A zero-sized region is free, wherever it points.
        if size.is_some_and(|size| size.is_zero()) {
            return GasBound::ZERO;
        }
        let (Some(offset), Some(size)) = (self.stack_constant(offset_depth), size) else {
            return GasBound::Unbounded;
        };
        match offset.checked_add(size) {
            Some(end) => self.grow_memory(end),
            None => GasBound::Unbounded,
        }
    }

    /// Charges the marginal cost of covering memory up to `end` bytes and
    /// advances the high-water mark.
    fn grow_memory(&mut self, end: U256) -> GasBound {
        if end <= self.largest_memory_access {
            return GasBound::ZERO;
        }
        let previous = self.largest_memory_access;
        self.largest_memory_access = end;

        let total = |bytes| calc::num_words(bytes).and_then(calc::memory_gas);
        match (total(end), total(previous)) {
            (Some(new), Some(old)) => GasBound::Finite(new - old),
            _ => GasBound::Unbounded,
        }
    }
}
