use super::OpCode;
use serde::{Deserialize, Serialize};

impl Serialize for OpCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.get())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let byte = u8::deserialize(deserializer)?;
        Self::new(byte)
            .ok_or_else(|| serde::de::Error::custom(format_args!("undefined opcode 0x{byte:02X}")))
    }
}
