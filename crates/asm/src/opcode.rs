//! EVM opcode definitions and the instruction metadata jumptable.

use core::fmt;

#[cfg(feature = "serde")]
mod serde_impl;

/// Fixed cost bucket historically assigned to an instruction.
///
/// Tiers are data, not derivation: each instruction's tier is part of its
/// table entry. [`Tier::Special`] marks instructions whose cost has dynamic
/// or version-gated components; their static lookup cost is zero and they are
/// priced by instruction family instead.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    /// No charge.
    Zero,
    /// Cheapest chargeable instructions, mostly environment queries.
    Base,
    /// Simple arithmetic, comparisons, stack shuffling, pushes.
    VeryLow,
    /// Multiplication, division, sign extension.
    Low,
    /// Modular arithmetic and unconditional jumps.
    Mid,
    /// Conditional jumps.
    High,
    /// External account queries that never got repriced.
    Ext,
    /// Priced by instruction family, not by tier.
    Special,
}

/// An EVM opcode.
///
/// This is always a valid opcode, as declared in the [`opcode`][self] module
/// or the [`OPCODE_INFO_JUMPTABLE`] constant. Serde support goes through
/// [`OpCode::new`], so deserializing an unassigned byte fails instead of
/// producing an invalid opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OpCode(u8);

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.get();
        if let Some(val) = OPCODE_INFO_JUMPTABLE[n as usize] {
            f.write_str(val.name())
        } else {
            write!(f, "UNKNOWN(0x{n:02X})")
        }
    }
}

impl OpCode {
    /// Instantiates a new opcode from a u8.
    #[inline]
    pub const fn new(opcode: u8) -> Option<Self> {
        match OPCODE_INFO_JUMPTABLE[opcode as usize] {
            Some(_) => Some(Self(opcode)),
            None => None,
        }
    }

    /// Returns true if the opcode is a `PUSH` instruction.
    #[inline]
    pub const fn is_push(self) -> bool {
        self.0 >= PUSH1 && self.0 <= PUSH32
    }

    /// Returns true if the opcode is a jump destination.
    #[inline]
    pub const fn is_jumpdest(self) -> bool {
        self.0 == JUMPDEST
    }

    /// Returns the opcode name.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.info().name()
    }

    /// Returns the number of input stack elements.
    #[inline]
    pub const fn inputs(self) -> u8 {
        self.info().inputs()
    }

    /// Returns the number of output stack elements.
    #[inline]
    pub const fn outputs(self) -> u8 {
        self.info().outputs()
    }

    /// Returns the gas tier of the opcode.
    #[inline]
    pub const fn tier(self) -> Tier {
        self.info().tier()
    }

    /// Returns the opcode information.
    #[inline]
    pub const fn info(self) -> OpCodeInfo {
        if let Some(t) = OPCODE_INFO_JUMPTABLE[self.0 as usize] {
            t
        } else {
            panic!("opcode not found")
        }
    }

    /// Returns the opcode as a u8.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Information about an opcode: name, stack inputs and outputs, immediate
/// width, and gas tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpCodeInfo {
    /// Uppercase mnemonic.
    name: &'static str,
    /// Stack inputs.
    inputs: u8,
    /// Stack outputs.
    outputs: u8,
    /// Number of immediate bytes following the opcode in assembled bytecode.
    immediate_size: u8,
    /// If the opcode stops execution. aka STOP, RETURN, ..
    terminating: bool,
    /// Gas tier.
    tier: Tier,
}

impl OpCodeInfo {
    /// Creates a new opcode info with the given name and default values.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            inputs: 0,
            outputs: 0,
            immediate_size: 0,
            terminating: false,
            tier: Tier::Zero,
        }
    }

    /// Returns the opcode name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of input stack elements.
    #[inline]
    pub const fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Returns the number of output stack elements.
    #[inline]
    pub const fn outputs(&self) -> u8 {
        self.outputs
    }

    /// Returns the size of the immediate value in bytes.
    #[inline]
    pub const fn immediate_size(&self) -> u8 {
        self.immediate_size
    }

    /// Returns whether this opcode terminates execution, e.g. `STOP`,
    /// `RETURN`, etc.
    #[inline]
    pub const fn is_terminating(&self) -> bool {
        self.terminating
    }

    /// Returns the gas tier.
    #[inline]
    pub const fn tier(&self) -> Tier {
        self.tier
    }
}

/// Sets the number of stack inputs and outputs.
#[inline]
pub const fn stack_io(mut op: OpCodeInfo, inputs: u8, outputs: u8) -> OpCodeInfo {
    op.inputs = inputs;
    op.outputs = outputs;
    op
}

/// Sets the immediate bytes number.
#[inline]
pub const fn immediate_size(mut op: OpCodeInfo, n: u8) -> OpCodeInfo {
    op.immediate_size = n;
    op
}

/// Sets the terminating flag to true.
#[inline]
pub const fn terminating(mut op: OpCodeInfo) -> OpCodeInfo {
    op.terminating = true;
    op
}

/// Sets the gas tier.
#[inline]
pub const fn tier(mut op: OpCodeInfo, tier: Tier) -> OpCodeInfo {
    op.tier = tier;
    op
}

macro_rules! opcodes {
    ($($val:literal => $name:ident => $($modifier:ident $(( $($modifier_arg:expr),* ))?),*);* $(;)?) => {
        // Constants for each opcode.
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name), "\") opcode.")]
            pub const $name: u8 = $val;
        )*
        impl OpCode {$(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name), "\") opcode.")]
            pub const $name: Self = Self($val);
        )*}

        /// Maps each opcode to its info.
        pub const OPCODE_INFO_JUMPTABLE: [Option<OpCodeInfo>; 256] = {
            let mut map = [None; 256];
            let mut prev: u8 = 0;
            $(
                let val: u8 = $val;
                assert!(val == 0 || val > prev, "opcodes must be sorted in ascending order");
                prev = val;
                let info = OpCodeInfo::new(stringify!($name));
                $(
                let info = $modifier(info, $($($modifier_arg),*)?);
                )*
                map[$val] = Some(info);
            )*
            let _ = prev;
            map
        };
    };
}

// When adding new opcodes:
// 1. add the opcode to the list below; make sure it's sorted by opcode value
// 2. assign the stack arity and the gas tier of the instruction
opcodes! {
    0x00 => STOP => stack_io(0, 0), terminating, tier(Tier::Zero);

    0x01 => ADD        => stack_io(2, 1), tier(Tier::VeryLow);
    0x02 => MUL        => stack_io(2, 1), tier(Tier::Low);
    0x03 => SUB        => stack_io(2, 1), tier(Tier::VeryLow);
    0x04 => DIV        => stack_io(2, 1), tier(Tier::Low);
    0x05 => SDIV       => stack_io(2, 1), tier(Tier::Low);
    0x06 => MOD        => stack_io(2, 1), tier(Tier::Low);
    0x07 => SMOD       => stack_io(2, 1), tier(Tier::Low);
    0x08 => ADDMOD     => stack_io(3, 1), tier(Tier::Mid);
    0x09 => MULMOD     => stack_io(3, 1), tier(Tier::Mid);
    0x0A => EXP        => stack_io(2, 1), tier(Tier::Special);
    0x0B => SIGNEXTEND => stack_io(2, 1), tier(Tier::Low);
    // 0x0C
    // 0x0D
    // 0x0E
    // 0x0F
    0x10 => LT     => stack_io(2, 1), tier(Tier::VeryLow);
    0x11 => GT     => stack_io(2, 1), tier(Tier::VeryLow);
    0x12 => SLT    => stack_io(2, 1), tier(Tier::VeryLow);
    0x13 => SGT    => stack_io(2, 1), tier(Tier::VeryLow);
    0x14 => EQ     => stack_io(2, 1), tier(Tier::VeryLow);
    0x15 => ISZERO => stack_io(1, 1), tier(Tier::VeryLow);
    0x16 => AND    => stack_io(2, 1), tier(Tier::VeryLow);
    0x17 => OR     => stack_io(2, 1), tier(Tier::VeryLow);
    0x18 => XOR    => stack_io(2, 1), tier(Tier::VeryLow);
    0x19 => NOT    => stack_io(1, 1), tier(Tier::VeryLow);
    0x1A => BYTE   => stack_io(2, 1), tier(Tier::VeryLow);
    0x1B => SHL    => stack_io(2, 1), tier(Tier::VeryLow);
    0x1C => SHR    => stack_io(2, 1), tier(Tier::VeryLow);
    0x1D => SAR    => stack_io(2, 1), tier(Tier::VeryLow);
    // 0x1E
    // 0x1F
    0x20 => KECCAK256 => stack_io(2, 1), tier(Tier::Special);
    // 0x21 - 0x2F
    0x30 => ADDRESS        => stack_io(0, 1), tier(Tier::Base);
    0x31 => BALANCE        => stack_io(1, 1), tier(Tier::Ext);
    0x32 => ORIGIN         => stack_io(0, 1), tier(Tier::Base);
    0x33 => CALLER         => stack_io(0, 1), tier(Tier::Base);
    0x34 => CALLVALUE      => stack_io(0, 1), tier(Tier::Base);
    0x35 => CALLDATALOAD   => stack_io(1, 1), tier(Tier::VeryLow);
    0x36 => CALLDATASIZE   => stack_io(0, 1), tier(Tier::Base);
    0x37 => CALLDATACOPY   => stack_io(3, 0), tier(Tier::VeryLow);
    0x38 => CODESIZE       => stack_io(0, 1), tier(Tier::Base);
    0x39 => CODECOPY       => stack_io(3, 0), tier(Tier::VeryLow);
    0x3A => GASPRICE       => stack_io(0, 1), tier(Tier::Base);
    0x3B => EXTCODESIZE    => stack_io(1, 1), tier(Tier::Ext);
    0x3C => EXTCODECOPY    => stack_io(4, 0), tier(Tier::Ext);
    0x3D => RETURNDATASIZE => stack_io(0, 1), tier(Tier::Base);
    0x3E => RETURNDATACOPY => stack_io(3, 0), tier(Tier::VeryLow);
    0x3F => EXTCODEHASH    => stack_io(1, 1), tier(Tier::Ext);
    0x40 => BLOCKHASH      => stack_io(1, 1), tier(Tier::Ext);
    0x41 => COINBASE       => stack_io(0, 1), tier(Tier::Base);
    0x42 => TIMESTAMP      => stack_io(0, 1), tier(Tier::Base);
    0x43 => NUMBER         => stack_io(0, 1), tier(Tier::Base);
    0x44 => DIFFICULTY     => stack_io(0, 1), tier(Tier::Base);
    0x45 => GASLIMIT       => stack_io(0, 1), tier(Tier::Base);
    // 0x46 - 0x4F
    0x50 => POP      => stack_io(1, 0), tier(Tier::Base);
    0x51 => MLOAD    => stack_io(1, 1), tier(Tier::VeryLow);
    0x52 => MSTORE   => stack_io(2, 0), tier(Tier::VeryLow);
    0x53 => MSTORE8  => stack_io(2, 0), tier(Tier::VeryLow);
    0x54 => SLOAD    => stack_io(1, 1), tier(Tier::Special);
    0x55 => SSTORE   => stack_io(2, 0), tier(Tier::Special);
    0x56 => JUMP     => stack_io(1, 0), tier(Tier::Mid);
    0x57 => JUMPI    => stack_io(2, 0), tier(Tier::High);
    0x58 => PC       => stack_io(0, 1), tier(Tier::Base);
    0x59 => MSIZE    => stack_io(0, 1), tier(Tier::Base);
    0x5A => GAS      => stack_io(0, 1), tier(Tier::Base);
    0x5B => JUMPDEST => stack_io(0, 0), tier(Tier::Special);
    // 0x5C - 0x5F
    0x60 => PUSH1  => stack_io(0, 1), immediate_size(1), tier(Tier::VeryLow);
    0x61 => PUSH2  => stack_io(0, 1), immediate_size(2), tier(Tier::VeryLow);
    0x62 => PUSH3  => stack_io(0, 1), immediate_size(3), tier(Tier::VeryLow);
    0x63 => PUSH4  => stack_io(0, 1), immediate_size(4), tier(Tier::VeryLow);
    0x64 => PUSH5  => stack_io(0, 1), immediate_size(5), tier(Tier::VeryLow);
    0x65 => PUSH6  => stack_io(0, 1), immediate_size(6), tier(Tier::VeryLow);
    0x66 => PUSH7  => stack_io(0, 1), immediate_size(7), tier(Tier::VeryLow);
    0x67 => PUSH8  => stack_io(0, 1), immediate_size(8), tier(Tier::VeryLow);
    0x68 => PUSH9  => stack_io(0, 1), immediate_size(9), tier(Tier::VeryLow);
    0x69 => PUSH10 => stack_io(0, 1), immediate_size(10), tier(Tier::VeryLow);
    0x6A => PUSH11 => stack_io(0, 1), immediate_size(11), tier(Tier::VeryLow);
    0x6B => PUSH12 => stack_io(0, 1), immediate_size(12), tier(Tier::VeryLow);
    0x6C => PUSH13 => stack_io(0, 1), immediate_size(13), tier(Tier::VeryLow);
    0x6D => PUSH14 => stack_io(0, 1), immediate_size(14), tier(Tier::VeryLow);
    0x6E => PUSH15 => stack_io(0, 1), immediate_size(15), tier(Tier::VeryLow);
    0x6F => PUSH16 => stack_io(0, 1), immediate_size(16), tier(Tier::VeryLow);
    0x70 => PUSH17 => stack_io(0, 1), immediate_size(17), tier(Tier::VeryLow);
    0x71 => PUSH18 => stack_io(0, 1), immediate_size(18), tier(Tier::VeryLow);
    0x72 => PUSH19 => stack_io(0, 1), immediate_size(19), tier(Tier::VeryLow);
    0x73 => PUSH20 => stack_io(0, 1), immediate_size(20), tier(Tier::VeryLow);
    0x74 => PUSH21 => stack_io(0, 1), immediate_size(21), tier(Tier::VeryLow);
    0x75 => PUSH22 => stack_io(0, 1), immediate_size(22), tier(Tier::VeryLow);
    0x76 => PUSH23 => stack_io(0, 1), immediate_size(23), tier(Tier::VeryLow);
    0x77 => PUSH24 => stack_io(0, 1), immediate_size(24), tier(Tier::VeryLow);
    0x78 => PUSH25 => stack_io(0, 1), immediate_size(25), tier(Tier::VeryLow);
    0x79 => PUSH26 => stack_io(0, 1), immediate_size(26), tier(Tier::VeryLow);
    0x7A => PUSH27 => stack_io(0, 1), immediate_size(27), tier(Tier::VeryLow);
    0x7B => PUSH28 => stack_io(0, 1), immediate_size(28), tier(Tier::VeryLow);
    0x7C => PUSH29 => stack_io(0, 1), immediate_size(29), tier(Tier::VeryLow);
    0x7D => PUSH30 => stack_io(0, 1), immediate_size(30), tier(Tier::VeryLow);
    0x7E => PUSH31 => stack_io(0, 1), immediate_size(31), tier(Tier::VeryLow);
    0x7F => PUSH32 => stack_io(0, 1), immediate_size(32), tier(Tier::VeryLow);
    0x80 => DUP1  => stack_io(1, 2), tier(Tier::VeryLow);
    0x81 => DUP2  => stack_io(2, 3), tier(Tier::VeryLow);
    0x82 => DUP3  => stack_io(3, 4), tier(Tier::VeryLow);
    0x83 => DUP4  => stack_io(4, 5), tier(Tier::VeryLow);
    0x84 => DUP5  => stack_io(5, 6), tier(Tier::VeryLow);
    0x85 => DUP6  => stack_io(6, 7), tier(Tier::VeryLow);
    0x86 => DUP7  => stack_io(7, 8), tier(Tier::VeryLow);
    0x87 => DUP8  => stack_io(8, 9), tier(Tier::VeryLow);
    0x88 => DUP9  => stack_io(9, 10), tier(Tier::VeryLow);
    0x89 => DUP10 => stack_io(10, 11), tier(Tier::VeryLow);
    0x8A => DUP11 => stack_io(11, 12), tier(Tier::VeryLow);
    0x8B => DUP12 => stack_io(12, 13), tier(Tier::VeryLow);
    0x8C => DUP13 => stack_io(13, 14), tier(Tier::VeryLow);
    0x8D => DUP14 => stack_io(14, 15), tier(Tier::VeryLow);
    0x8E => DUP15 => stack_io(15, 16), tier(Tier::VeryLow);
    0x8F => DUP16 => stack_io(16, 17), tier(Tier::VeryLow);
    0x90 => SWAP1  => stack_io(2, 2), tier(Tier::VeryLow);
    0x91 => SWAP2  => stack_io(3, 3), tier(Tier::VeryLow);
    0x92 => SWAP3  => stack_io(4, 4), tier(Tier::VeryLow);
    0x93 => SWAP4  => stack_io(5, 5), tier(Tier::VeryLow);
    0x94 => SWAP5  => stack_io(6, 6), tier(Tier::VeryLow);
    0x95 => SWAP6  => stack_io(7, 7), tier(Tier::VeryLow);
    0x96 => SWAP7  => stack_io(8, 8), tier(Tier::VeryLow);
    0x97 => SWAP8  => stack_io(9, 9), tier(Tier::VeryLow);
    0x98 => SWAP9  => stack_io(10, 10), tier(Tier::VeryLow);
    0x99 => SWAP10 => stack_io(11, 11), tier(Tier::VeryLow);
    0x9A => SWAP11 => stack_io(12, 12), tier(Tier::VeryLow);
    0x9B => SWAP12 => stack_io(13, 13), tier(Tier::VeryLow);
    0x9C => SWAP13 => stack_io(14, 14), tier(Tier::VeryLow);
    0x9D => SWAP14 => stack_io(15, 15), tier(Tier::VeryLow);
    0x9E => SWAP15 => stack_io(16, 16), tier(Tier::VeryLow);
    0x9F => SWAP16 => stack_io(17, 17), tier(Tier::VeryLow);
    0xA0 => LOG0 => stack_io(2, 0), tier(Tier::Special);
    0xA1 => LOG1 => stack_io(3, 0), tier(Tier::Special);
    0xA2 => LOG2 => stack_io(4, 0), tier(Tier::Special);
    0xA3 => LOG3 => stack_io(5, 0), tier(Tier::Special);
    0xA4 => LOG4 => stack_io(6, 0), tier(Tier::Special);
    // 0xA5 - 0xEF
    0xF0 => CREATE       => stack_io(3, 1), tier(Tier::Special);
    0xF1 => CALL         => stack_io(7, 1), tier(Tier::Special);
    0xF2 => CALLCODE     => stack_io(7, 1), tier(Tier::Special);
    0xF3 => RETURN       => stack_io(2, 0), terminating, tier(Tier::Zero);
    0xF4 => DELEGATECALL => stack_io(6, 1), tier(Tier::Special);
    0xF5 => CREATE2      => stack_io(4, 1), tier(Tier::Special);
    // 0xF6 - 0xF9
    0xFA => STATICCALL   => stack_io(6, 1), tier(Tier::Special);
    // 0xFB - 0xFC
    0xFD => REVERT       => stack_io(2, 0), terminating, tier(Tier::Zero);
    0xFE => INVALID      => stack_io(0, 0), terminating, tier(Tier::Zero);
    0xFF => SELFDESTRUCT => stack_io(1, 0), terminating, tier(Tier::Special);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_opcode_count() {
        let count = OPCODE_INFO_JUMPTABLE.iter().filter(|i| i.is_some()).count();
        assert_eq!(count, 140);
    }

    #[test]
    fn mstore_metadata() {
        let info = OpCode::MSTORE.info();
        assert_eq!(info.name(), "MSTORE");
        assert_eq!(info.inputs(), 2);
        assert_eq!(info.outputs(), 0);
        assert_eq!(info.tier(), Tier::VeryLow);
        assert!(!info.is_terminating());
    }

    #[test]
    fn push_immediate_sizes() {
        for (i, op) in (PUSH1..=PUSH32).enumerate() {
            let opcode = OpCode::new(op).unwrap();
            assert!(opcode.is_push());
            assert_eq!(opcode.info().immediate_size(), i as u8 + 1);
            assert_eq!(opcode.tier(), Tier::VeryLow);
        }
        assert!(!OpCode::MLOAD.is_push());
    }

    #[test]
    fn dup_swap_arities() {
        for (i, op) in (DUP1..=DUP16).enumerate() {
            let n = i as u8 + 1;
            let info = OpCode::new(op).unwrap().info();
            assert_eq!((info.inputs(), info.outputs()), (n, n + 1));
        }
        for (i, op) in (SWAP1..=SWAP16).enumerate() {
            let n = i as u8 + 1;
            let info = OpCode::new(op).unwrap().info();
            assert_eq!((info.inputs(), info.outputs()), (n + 1, n + 1));
        }
    }

    #[test]
    fn log_arities() {
        for (topics, op) in (LOG0..=LOG4).enumerate() {
            let info = OpCode::new(op).unwrap().info();
            assert_eq!(info.inputs(), topics as u8 + 2);
            assert_eq!(info.outputs(), 0);
            assert_eq!(info.tier(), Tier::Special);
        }
    }

    #[test]
    fn terminating_set() {
        let terminating: Vec<u8> = OPCODE_INFO_JUMPTABLE
            .iter()
            .enumerate()
            .filter_map(|(i, info)| info.filter(|info| info.is_terminating()).map(|_| i as u8))
            .collect();
        assert_eq!(terminating, [STOP, RETURN, REVERT, INVALID, SELFDESTRUCT]);
    }

    #[test]
    fn undefined_gaps() {
        for op in [0x0Cu8, 0x1E, 0x21, 0x46, 0x5C, 0xA5, 0xF6, 0xFB] {
            assert!(OpCode::new(op).is_none(), "0x{op:02X} should be undefined");
            assert_eq!(OPCODE_INFO_JUMPTABLE[op as usize], None);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(OpCode::KECCAK256.to_string(), "KECCAK256");
        assert_eq!(OpCode::SELFDESTRUCT.as_str(), "SELFDESTRUCT");
        assert_eq!(OpCode::new(0x0C).map(|op| op.to_string()), None);
    }

    #[test]
    fn jumpdest_is_special_cased() {
        assert!(OpCode::JUMPDEST.is_jumpdest());
        assert_eq!(OpCode::JUMPDEST.tier(), Tier::Special);
        assert!(!OpCode::JUMP.is_jumpdest());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_rejects_undefined_opcodes() {
        let json = serde_json::to_string(&OpCode::KECCAK256).unwrap();
        assert_eq!(json, "32");
        assert_eq!(serde_json::from_str::<OpCode>(&json).unwrap(), OpCode::KECCAK256);

        // 77 is 0x4D, inside the 0x46..0x4F gap.
        assert!(serde_json::from_str::<OpCode>("77").is_err());
        assert!(serde_json::from_str::<crate::AsmItem>(r#"{"Op":77}"#).is_err());
    }
}
