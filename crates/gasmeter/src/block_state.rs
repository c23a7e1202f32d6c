//! A state tracker that learns constants from the instruction stream itself.

use crate::state::{StateTracker, ValueId};
use asm::{opcode, AsmItem, OpCode};
use primitives::map::HashMap;
use primitives::{STACK_LIMIT, U256};
use std::vec::Vec;

/// Symbolic state for one straight-line block, starting with no knowledge.
///
/// Constants enter through `PUSH` items and are followed through stack
/// shuffling, `MSTORE`/`MLOAD` pairs with statically known offsets, and
/// `SSTORE`/`SLOAD` pairs with statically known slots. Everything else
/// degrades to unknown values, which keeps the derived bounds sound.
///
/// [`Clone`] forks the state, so a shared prefix can feed several branches.
#[derive(Clone, Debug, Default)]
pub struct BlockState {
    /// Known constant for every minted reference, `None` when unknown.
    values: Vec<Option<U256>>,
    /// Symbolic stack, top last. Slots below everything the block has pushed
    /// are materialized lazily as unknowns.
    stack: Vec<ValueId>,
    /// Tracked content of storage slots with statically known addresses.
    storage: HashMap<U256, ValueId>,
    /// Tracked content of 32-byte memory words at statically known offsets.
    memory: HashMap<U256, ValueId>,
    /// Items applied so far.
    position: u64,
}

/// Whether the tracked 32-byte word at `slot` intersects a write to
/// `[start, start + len)`.
fn overlaps(slot: U256, start: U256, len: U256) -> bool {
    !len.is_zero()
        && slot < start.saturating_add(len)
        && start < slot.saturating_add(U256::from(32u64))
}

impl BlockState {
    /// Creates a state with no knowledge about its surroundings.
    pub fn new() -> Self {
        Self::default()
    }

    fn constant_of(&self, value: ValueId) -> Option<U256> {
        self.values.get(value.get()).copied().flatten()
    }

    fn mint(&mut self, value: Option<U256>) -> ValueId {
        let id = ValueId::new(self.values.len());
        self.values.push(value);
        id
    }

    fn push_unknown(&mut self) {
        let id = self.mint(None);
        self.stack.push(id);
    }

    /// Pops the top reference, materializing a slot established before the
    /// block when the tracked stack is empty.
    fn pop(&mut self) -> ValueId {
        match self.stack.pop() {
            Some(id) => id,
            None => self.mint(None),
        }
    }

    /// Materializes below-the-block slots until `depth` is addressable.
    fn ensure_depth(&mut self, depth: usize) {
        while self.stack.len() <= depth {
            let id = self.mint(None);
            self.stack.insert(0, id);
        }
    }

    fn write_memory_word(&mut self, offset: ValueId, value: Option<ValueId>, width: u64) {
        let Some(offset) = self.constant_of(offset) else {
            self.memory.clear();
            return;
        };
        let width = U256::from(width);
        self.memory.retain(|&slot, _| !overlaps(slot, offset, width));
        if let Some(value) = value {
            self.memory.insert(offset, value);
        }
    }

    fn write_memory_range(&mut self, offset: ValueId, len: ValueId) {
        let len = self.constant_of(len);
        // A write of statically known zero length touches nothing, even at
        // an unknown offset.
        if len.is_some_and(|len| len.is_zero()) {
            return;
        }
        match (self.constant_of(offset), len) {
            (Some(offset), Some(len)) => {
                self.memory.retain(|&slot, _| !overlaps(slot, offset, len));
            }
            _ => self.memory.clear(),
        }
    }

    fn pop_push_unknown(&mut self, op: OpCode) {
        for _ in 0..op.inputs() {
            self.pop();
        }
        for _ in 0..op.outputs() {
            self.push_unknown();
        }
    }

    fn advance_op(&mut self, op: OpCode) {
        match op.get() {
            opcode::POP => {
                self.pop();
            }
            opcode::DUP1..=opcode::DUP16 => {
                let depth = (op.get() - opcode::DUP1) as usize;
                self.ensure_depth(depth);
                let id = self.stack[self.stack.len() - 1 - depth];
                self.stack.push(id);
            }
            opcode::SWAP1..=opcode::SWAP16 => {
                let depth = (op.get() - opcode::SWAP1) as usize + 1;
                self.ensure_depth(depth);
                let top = self.stack.len() - 1;
                self.stack.swap(top, top - depth);
            }
            opcode::MLOAD => {
                let offset = self.pop();
                let loaded = self
                    .constant_of(offset)
                    .and_then(|offset| self.memory.get(&offset).copied());
                match loaded {
                    Some(value) => self.stack.push(value),
                    None => self.push_unknown(),
                }
            }
            opcode::MSTORE => {
                let offset = self.pop();
                let value = self.pop();
                self.write_memory_word(offset, Some(value), 32);
            }
            opcode::MSTORE8 => {
                let offset = self.pop();
                self.pop();
                // Only whole aligned words are tracked; a byte write just
                // invalidates whatever it touches.
                self.write_memory_word(offset, None, 1);
            }
            opcode::SLOAD => {
                let slot = self.pop();
                let loaded = self
                    .constant_of(slot)
                    .and_then(|slot| self.storage.get(&slot).copied());
                match loaded {
                    Some(value) => self.stack.push(value),
                    None => self.push_unknown(),
                }
            }
            opcode::SSTORE => {
                let slot = self.pop();
                let value = self.pop();
                match self.constant_of(slot) {
                    Some(slot) => {
                        self.storage.insert(slot, value);
                    }
                    None => self.storage.clear(),
                }
            }
            opcode::CALLDATACOPY | opcode::CODECOPY | opcode::RETURNDATACOPY => {
                let dest = self.pop();
                self.pop();
                let len = self.pop();
                self.write_memory_range(dest, len);
            }
            opcode::EXTCODECOPY => {
                self.pop();
                let dest = self.pop();
                self.pop();
                let len = self.pop();
                self.write_memory_range(dest, len);
            }
            opcode::CALL | opcode::CALLCODE | opcode::DELEGATECALL | opcode::STATICCALL => {
                self.pop_push_unknown(op);
                // The callee writes the return region, and unless the call
                // is static it can reenter and write the caller's storage.
                self.memory.clear();
                if op.get() != opcode::STATICCALL {
                    self.storage.clear();
                }
            }
            opcode::CREATE | opcode::CREATE2 => {
                self.pop_push_unknown(op);
                // The constructor can reenter and write the caller's
                // storage.
                self.storage.clear();
            }
            _ => self.pop_push_unknown(op),
        }
    }
}

impl StateTracker for BlockState {
    fn known_constant(&self, value: ValueId) -> Option<U256> {
        self.constant_of(value)
    }

    fn stack_element(&mut self, depth: usize) -> ValueId {
        debug_assert!(depth < STACK_LIMIT, "stack depth out of range");
        self.ensure_depth(depth);
        self.stack[self.stack.len() - 1 - depth]
    }

    fn storage_value(&mut self, slot: ValueId) -> Option<ValueId> {
        let slot = self.constant_of(slot)?;
        self.storage.get(&slot).copied()
    }

    fn advance(&mut self, item: &AsmItem) {
        match item {
            AsmItem::Op(op) => self.advance_op(*op),
            AsmItem::Push(value) => {
                let id = self.mint(Some(*value));
                self.stack.push(id);
            }
            AsmItem::PushLabel(_) => self.push_unknown(),
            AsmItem::Label(_) => {}
        }
        self.position += 1;
    }

    fn position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm::LabelId;

    fn apply(state: &mut BlockState, items: &[AsmItem]) {
        for item in items {
            state.advance(item);
        }
    }

    fn push(value: u64) -> AsmItem {
        AsmItem::Push(U256::from(value))
    }

    fn top_constant(state: &mut BlockState) -> Option<U256> {
        let id = state.stack_element(0);
        state.known_constant(id)
    }

    #[test]
    fn learns_push_constants() {
        let mut state = BlockState::new();
        state.advance(&push(42));
        assert_eq!(top_constant(&mut state), Some(U256::from(42u64)));
    }

    #[test]
    fn label_pushes_are_not_constants() {
        let mut state = BlockState::new();
        state.advance(&AsmItem::PushLabel(LabelId::new(3)));
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn slots_below_the_block_are_unknown_but_stable() {
        let mut state = BlockState::new();
        let first = state.stack_element(0);
        let again = state.stack_element(0);
        assert_eq!(first, again);
        assert_eq!(state.known_constant(first), None);
        assert_ne!(state.stack_element(1), first);
    }

    #[test]
    fn dup_and_swap_follow_knowledge() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), AsmItem::Op(OpCode::DUP1)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));

        apply(&mut state, &[push(9), AsmItem::Op(OpCode::SWAP1)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));
        let below = state.stack_element(1);
        assert_eq!(state.known_constant(below), Some(U256::from(9u64)));
    }

    #[test]
    fn arithmetic_folds_to_unknown() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(1), push(2), AsmItem::Op(OpCode::ADD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn mstore_then_mload_round_trips() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(42u64)));
    }

    #[test]
    fn overlapping_store_invalidates_tracked_words() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        apply(&mut state, &[push(7), push(80), AsmItem::Op(OpCode::MSTORE)]);

        apply(&mut state, &[push(80), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));
        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn disjoint_stores_coexist() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(0), AsmItem::Op(OpCode::MSTORE)]);
        apply(&mut state, &[push(7), push(32), AsmItem::Op(OpCode::MSTORE)]);

        apply(&mut state, &[push(0), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(42u64)));
        apply(&mut state, &[push(32), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));
    }

    #[test]
    fn byte_store_invalidates_without_tracking() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        apply(&mut state, &[push(1), push(70), AsmItem::Op(OpCode::MSTORE8)]);

        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
        apply(&mut state, &[push(70), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn unknown_offset_store_wipes_memory() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        // PC pushes an unknown, so this store goes who-knows-where.
        apply(&mut state, &[push(7), AsmItem::Op(OpCode::PC), AsmItem::Op(OpCode::MSTORE)]);

        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn zero_length_copy_keeps_knowledge() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        apply(
            &mut state,
            &[push(0), push(0), AsmItem::Op(OpCode::GAS), AsmItem::Op(OpCode::CALLDATACOPY)],
        );

        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(42u64)));
    }

    #[test]
    fn unknown_length_copy_wipes_memory() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        apply(
            &mut state,
            &[AsmItem::Op(OpCode::CALLDATASIZE), push(0), push(0), AsmItem::Op(OpCode::CALLDATACOPY)],
        );

        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn storage_round_trips_through_known_slots() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), push(5), AsmItem::Op(OpCode::SSTORE)]);

        apply(&mut state, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));

        state.advance(&push(5));
        let slot = state.stack_element(0);
        let tracked = state.storage_value(slot);
        assert!(tracked.is_some_and(|id| state.known_constant(id) == Some(U256::from(7u64))));
    }

    #[test]
    fn unknown_slot_store_wipes_storage() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), push(5), AsmItem::Op(OpCode::SSTORE)]);
        apply(&mut state, &[push(9), AsmItem::Op(OpCode::GAS), AsmItem::Op(OpCode::SSTORE)]);

        apply(&mut state, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn calls_wipe_tracked_state() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), push(5), AsmItem::Op(OpCode::SSTORE)]);
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        state.advance(&AsmItem::Op(OpCode::CALL));

        apply(&mut state, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut state), None);
        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn static_calls_preserve_storage_knowledge() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), push(5), AsmItem::Op(OpCode::SSTORE)]);
        apply(&mut state, &[push(42), push(64), AsmItem::Op(OpCode::MSTORE)]);
        state.advance(&AsmItem::Op(OpCode::STATICCALL));

        apply(&mut state, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));
        apply(&mut state, &[push(64), AsmItem::Op(OpCode::MLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn create_wipes_storage_knowledge() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), push(5), AsmItem::Op(OpCode::SSTORE)]);
        state.advance(&AsmItem::Op(OpCode::CREATE));

        apply(&mut state, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut state), None);
    }

    #[test]
    fn position_counts_every_item() {
        let mut state = BlockState::new();
        assert_eq!(state.position(), 0);
        apply(
            &mut state,
            &[push(1), AsmItem::Label(LabelId::new(0)), AsmItem::Op(OpCode::POP)],
        );
        assert_eq!(state.position(), 3);
    }

    #[test]
    fn clone_forks_the_state() {
        let mut state = BlockState::new();
        apply(&mut state, &[push(7), push(5), AsmItem::Op(OpCode::SSTORE)]);

        let mut fork = state.clone();
        apply(&mut fork, &[push(9), AsmItem::Op(OpCode::GAS), AsmItem::Op(OpCode::SSTORE)]);

        apply(&mut fork, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut fork), None);
        apply(&mut state, &[push(5), AsmItem::Op(OpCode::SLOAD)]);
        assert_eq!(top_constant(&mut state), Some(U256::from(7u64)));
    }
}
