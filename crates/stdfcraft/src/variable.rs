//! Variable-type unpacker for `V*n` fields (GDR generic data).
//!
//! Each element starts with a one-byte type code. The decoded element is rendered as its
//! type letter followed by the value, e.g. `U12` or `Thello`.

use crate::{
    errors::ReadError,
    reader::ByteReader,
    unpack::{self, DnMode},
    value::Value,
    wire::WireType,
};

/// Element types a `V*n` field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// `B*0` pad byte, used only for alignment.
    Pad,
    U1,
    U2,
    U4,
    I1,
    I2,
    I4,
    R4,
    R8,
    Cn,
    Bn,
    Dn,
    N1,
}

impl VariableType {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => VariableType::Pad,
            1 => VariableType::U1,
            2 => VariableType::U2,
            3 => VariableType::U4,
            4 => VariableType::I1,
            5 => VariableType::I2,
            6 => VariableType::I4,
            7 => VariableType::R4,
            8 => VariableType::R8,
            10 => VariableType::Cn,
            11 => VariableType::Bn,
            12 => VariableType::Dn,
            13 => VariableType::N1,
            _ => return None,
        })
    }

    /// Underlying wire type; `None` for the pad byte.
    pub fn wire(self) -> Option<WireType> {
        match self {
            VariableType::Pad => None,
            VariableType::U1 => Some(WireType::U1),
            VariableType::U2 => Some(WireType::U2),
            VariableType::U4 => Some(WireType::U4),
            VariableType::I1 => Some(WireType::I1),
            VariableType::I2 => Some(WireType::I2),
            VariableType::I4 => Some(WireType::I4),
            VariableType::R4 => Some(WireType::R4),
            VariableType::R8 => Some(WireType::R8),
            VariableType::Cn => Some(WireType::Cn),
            VariableType::Bn => Some(WireType::Bn),
            VariableType::Dn => Some(WireType::Dn),
            VariableType::N1 => Some(WireType::N1),
        }
    }

    /// Letter written in front of the element value.
    pub fn prefix(self) -> &'static str {
        match self {
            VariableType::Pad => "",
            VariableType::U1 => "U",
            VariableType::U2 => "M",
            VariableType::U4 => "B",
            VariableType::I1 => "I",
            VariableType::I2 => "S",
            VariableType::I4 => "L",
            VariableType::R4 => "F",
            VariableType::R8 => "D",
            VariableType::Cn => "T",
            VariableType::Bn => "X",
            VariableType::Dn => "Y",
            VariableType::N1 => "N",
        }
    }
}

/// Decodes `count` self-describing elements into an array of prefixed strings.
///
/// An unknown type code aborts the whole field: the element's width is unknown, so nothing
/// after it can be located.
pub fn unpack_vn(reader: &mut ByteReader<'_>, count: usize) -> Result<Value, ReadError> {
    let mut values = Vec::with_capacity(count.min(reader.remaining()));

    for _ in 0..count {
        let offset = reader.position();
        let code = reader.read_u8()?;
        let kind = VariableType::from_code(code)
            .ok_or(ReadError::UnknownVariableType { code, offset })?;

        let value = match kind.wire() {
            None => continue,
            Some(WireType::Dn) => unpack::unpack_dn(reader, DnMode::Hex)?,
            Some(wire) => unpack::unpack_field(reader, wire, 0)?,
        };

        values.push(Value::Str(format!("{}{}", kind.prefix(), value)));
    }

    Ok(Value::Array(values))
}
