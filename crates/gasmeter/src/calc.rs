//! Cost calculation for instructions whose price is version gated or derived
//! from operand sizes.

use crate::constants::*;
use asm::{OpCode, Tier};
use primitives::{SpecId, U256};

/// Gas cost of an instruction priced purely by its [`Tier`].
///
/// `JUMPDEST` sits in the special tier but carries a fixed individual price.
/// The remaining special-tier instructions are version or operand dependent
/// and are priced by the estimator itself, so their tier lookup is zero.
#[inline]
pub const fn tier_cost(op: OpCode) -> u64 {
    if op.is_jumpdest() {
        return JUMPDEST;
    }
    match op.tier() {
        Tier::Zero => ZERO,
        Tier::Base => BASE,
        Tier::VeryLow => VERYLOW,
        Tier::Low => LOW,
        Tier::Mid => MID,
        Tier::High => HIGH,
        Tier::Ext => EXT,
        Tier::Special => ZERO,
    }
}

/// `EXTCODESIZE` and `EXTCODEHASH` cost, also the base cost of
/// `EXTCODECOPY`.
#[inline]
pub const fn extcode_cost(spec_id: SpecId) -> u64 {
    if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        45
    } else {
        20
    }
}

/// `BALANCE` opcode cost.
#[inline]
pub const fn balance_cost(spec_id: SpecId) -> u64 {
    if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        25
    } else {
        20
    }
}

/// `SLOAD` opcode cost.
#[inline]
pub const fn sload_cost(spec_id: SpecId) -> u64 {
    if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        20
    } else {
        50
    }
}

/// Base cost of the `CALL` family, before value-transfer and new-account
/// surcharges.
#[inline]
pub const fn call_cost(spec_id: SpecId) -> u64 {
    if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        45
    } else {
        40
    }
}

/// `SELFDESTRUCT` opcode cost.
#[inline]
pub const fn selfdestruct_cost(spec_id: SpecId) -> u64 {
    if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        350
    } else {
        0
    }
}

/// Cost per significant byte of the `EXP` exponent.
#[inline]
pub const fn exp_byte_cost(spec_id: SpecId) -> u64 {
    if spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
        // EIP-160: EXP cost increase
        4
    } else {
        10
    }
}

/// `EXP` opcode cost for a statically known exponent.
#[inline]
pub fn exp_cost(spec_id: SpecId, power: U256) -> u64 {
    if power.is_zero() {
        EXP
    } else {
        EXP + exp_byte_cost(spec_id) * power.byte_len() as u64
    }
}

/// Returns the number of 32-byte words needed to cover `size` bytes.
///
/// `None` in the degenerate case where even the padded size leaves [`U256`].
#[inline]
pub fn num_words(size: U256) -> Option<U256> {
    Some(size.checked_add(U256::from(31u64))? >> 5)
}

/// Gas cost of an operation priced per 32-byte word of a `size`-byte buffer,
/// such as copies, hashing and code deposits.
#[inline]
pub fn cost_per_word(size: U256, multiple: u64) -> Option<U256> {
    num_words(size)?.checked_mul(U256::from(multiple))
}

/// Total gas cost of a memory region of `num_words` 32-byte words: a linear
/// part plus a quadratic part that makes large regions prohibitive.
#[inline]
pub fn memory_gas(num_words: U256) -> Option<U256> {
    let linear = num_words.checked_mul(U256::from(MEMORY))?;
    let quadratic = num_words.checked_mul(num_words)? / U256::from(MEMORY_QUADRATIC_DIVISOR);
    linear.checked_add(quadratic)
}

/// Intrinsic cost of a whole transaction carrying `input` as payload.
///
/// This is never part of an instruction estimate; callers add it once when
/// turning a block estimate into a transaction estimate.
pub fn transaction_cost(input: &[u8], is_creation: bool) -> u64 {
    let zero_data_len = input.iter().filter(|v| **v == 0).count() as u64;
    let non_zero_data_len = input.len() as u64 - zero_data_len;
    let base = if is_creation { TRANSACTION_CREATE } else { TRANSACTION };
    base + zero_data_len * TRANSACTION_ZERO_DATA + non_zero_data_len * TRANSACTION_NON_ZERO_DATA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_costs() {
        assert_eq!(tier_cost(OpCode::STOP), 0);
        assert_eq!(tier_cost(OpCode::ADDRESS), 1);
        assert_eq!(tier_cost(OpCode::ADD), 1);
        assert_eq!(tier_cost(OpCode::MUL), 2);
        assert_eq!(tier_cost(OpCode::ADDMOD), 3);
        assert_eq!(tier_cost(OpCode::JUMPI), 4);
        assert_eq!(tier_cost(OpCode::BLOCKHASH), 7);
    }

    #[test]
    fn jumpdest_has_individual_price() {
        assert_eq!(OpCode::JUMPDEST.tier(), Tier::Special);
        assert_eq!(tier_cost(OpCode::JUMPDEST), JUMPDEST);
    }

    #[test]
    fn special_tier_has_no_lookup_cost() {
        for op in [OpCode::SLOAD, OpCode::CALL, OpCode::CREATE, OpCode::EXP] {
            assert_eq!(tier_cost(op), 0);
        }
    }

    #[test]
    fn tangerine_repricings() {
        let pre = SpecId::HOMESTEAD;
        let post = SpecId::TANGERINE;

        assert_eq!((extcode_cost(pre), extcode_cost(post)), (20, 45));
        assert_eq!((balance_cost(pre), balance_cost(post)), (20, 25));
        assert_eq!((sload_cost(pre), sload_cost(post)), (50, 20));
        assert_eq!((call_cost(pre), call_cost(post)), (40, 45));
        assert_eq!((selfdestruct_cost(pre), selfdestruct_cost(post)), (0, 350));

        // EXP bytes are repriced one fork later.
        assert_eq!(exp_byte_cost(post), 10);
        assert_eq!(exp_byte_cost(SpecId::SPURIOUS_DRAGON), 4);
    }

    #[test]
    fn repricings_stay_enabled_in_later_versions() {
        assert_eq!(sload_cost(SpecId::BYZANTIUM), 20);
        assert_eq!(call_cost(SpecId::BYZANTIUM), 45);
        assert_eq!(exp_byte_cost(SpecId::BYZANTIUM), 4);
    }

    #[test]
    fn exp_cost_counts_significant_bytes() {
        let spec = SpecId::BYZANTIUM;
        assert_eq!(exp_cost(spec, U256::ZERO), 2);
        assert_eq!(exp_cost(spec, U256::from(1u64)), 2 + 4);
        assert_eq!(exp_cost(spec, U256::from(255u64)), 2 + 4);
        assert_eq!(exp_cost(spec, U256::from(256u64)), 2 + 4 * 2);
        assert_eq!(exp_cost(spec, U256::MAX), 2 + 4 * 32);

        assert_eq!(exp_cost(SpecId::HOMESTEAD, U256::from(256u64)), 2 + 10 * 2);
    }

    #[test]
    fn num_words_rounds_up() {
        assert_eq!(num_words(U256::ZERO), Some(U256::ZERO));
        assert_eq!(num_words(U256::from(1u64)), Some(U256::from(1u64)));
        assert_eq!(num_words(U256::from(32u64)), Some(U256::from(1u64)));
        assert_eq!(num_words(U256::from(33u64)), Some(U256::from(2u64)));
        assert_eq!(num_words(U256::MAX), None);
    }

    #[test]
    fn word_costs() {
        assert_eq!(cost_per_word(U256::from(33u64), KECCAK256WORD), Some(U256::from(2u64)));
        assert_eq!(cost_per_word(U256::from(96u64), CODEDEPOSIT), Some(U256::from(36u64)));
        assert_eq!(cost_per_word(U256::MAX, COPY), None);
    }

    #[test]
    fn memory_gas_closed_forms() {
        // Below 1024 words the quadratic part contributes nothing.
        assert_eq!(memory_gas(U256::from(3u64)), Some(U256::from(3u64)));
        assert_eq!(memory_gas(U256::from(32u64)), Some(U256::from(33u64)));
        assert_eq!(memory_gas(U256::from(1024u64)), Some(U256::from(2048u64)));
        assert_eq!(memory_gas(U256::MAX >> 5), None);
    }

    #[test]
    fn transaction_costs() {
        assert_eq!(transaction_cost(&[], false), 25000);
        assert_eq!(transaction_cost(&[], true), 20000);
        assert_eq!(transaction_cost(&[0, 0, 1, 0xff], false), 25000 + 2 + 8);
    }
}
