//! Primitive unpacker: turns the bytes of one field into a [Value].
//!
//! Every function reads through a [ByteReader], so a field that needs more bytes than the
//! payload still holds fails with [ReadError::OutOfBounds] and leaves the cursor where the
//! failing read started.

use crate::{
    bits,
    errors::ReadError,
    reader::{ByteReader, Endianness},
    value::Value,
    variable,
    wire::WireType,
};

/// Output form of a `D*n` blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnMode {
    /// Uppercase hex of the raw bytes.
    Hex,
    /// 1-based positions of the set bits.
    Positions,
}

/// Decodes one field of type `wire` at `offset` and returns it with the offset just past it.
///
/// `count` is the repeat count for array wire types and `V*n`; it is ignored otherwise.
pub fn unpack(
    data: &[u8],
    endianness: Endianness,
    offset: usize,
    wire: WireType,
    count: usize,
) -> Result<(Value, usize), ReadError> {
    let mut reader = ByteReader::at(data, endianness, offset);
    let value = unpack_field(&mut reader, wire, count)?;
    Ok((value, reader.position()))
}

/// Decodes one field of type `wire` from the reader's current position.
pub fn unpack_field(
    reader: &mut ByteReader<'_>,
    wire: WireType,
    count: usize,
) -> Result<Value, ReadError> {
    match wire {
        WireType::C1 => unpack_c1(reader),
        WireType::Cn => unpack_cn(reader),
        WireType::U1 => Ok(Value::Int(reader.read_u8()? as i64)),
        WireType::U2 => Ok(Value::Int(reader.read_u16()? as i64)),
        WireType::U4 => Ok(Value::Int(reader.read_u32()? as i64)),
        WireType::I1 => Ok(Value::Int(reader.read_i8()? as i64)),
        WireType::I2 => Ok(Value::Int(reader.read_i16()? as i64)),
        WireType::I4 => Ok(Value::Int(reader.read_i32()? as i64)),
        WireType::R4 => Ok(Value::Float(reader.read_f32()? as f64)),
        WireType::R8 => Ok(Value::Float(reader.read_f64()?)),
        WireType::B1 => Ok(Value::Str(bits::format_flag_byte(reader.read_u8()?))),
        WireType::Bn => unpack_bn(reader),
        WireType::Dn => unpack_dn(reader, DnMode::Positions),
        WireType::N1 => Ok(Value::Str(bits::low_nibble_hex(reader.read_u8()?))),
        WireType::Vn => variable::unpack_vn(reader, count),
        WireType::XC1 => unpack_array(reader, WireType::C1, count),
        WireType::XCn => unpack_array(reader, WireType::Cn, count),
        WireType::XU1 => unpack_array(reader, WireType::U1, count),
        WireType::XU2 => unpack_array(reader, WireType::U2, count),
        WireType::XU4 => unpack_array(reader, WireType::U4, count),
        WireType::XI1 => unpack_array(reader, WireType::I1, count),
        WireType::XI2 => unpack_array(reader, WireType::I2, count),
        WireType::XI4 => unpack_array(reader, WireType::I4, count),
        WireType::XR4 => unpack_array(reader, WireType::R4, count),
        WireType::XR8 => unpack_array(reader, WireType::R8, count),
        WireType::XN1 => unpack_xn1(reader, count),
    }
}

pub fn unpack_c1(reader: &mut ByteReader<'_>) -> Result<Value, ReadError> {
    match reader.read_u8()? {
        0 => Ok(Value::Absent),
        byte => Ok(Value::Str((byte as char).to_string())),
    }
}

/// Counted string. Null bytes inside are dropped.
pub fn unpack_cn(reader: &mut ByteReader<'_>) -> Result<Value, ReadError> {
    let len = reader.read_u8()? as usize;
    let offset = reader.position();
    let bytes = reader.take(len)?;

    let mut out = String::with_capacity(len);
    let mut nulls = 0usize;
    for &byte in bytes {
        if byte == 0 {
            nulls += 1;
            continue;
        }
        out.push(byte as char);
    }

    if nulls > 0 {
        tracing::warn!(offset, nulls, "skipped null byte(s) inside counted string");
    }

    Ok(Value::Str(out))
}

pub fn unpack_bn(reader: &mut ByteReader<'_>) -> Result<Value, ReadError> {
    let len = reader.read_u8()? as usize;
    let bytes = reader.take(len)?;

    Ok(match bits::to_trimmed_hex(bytes) {
        Some(hex) => Value::Str(hex),
        None => Value::Absent,
    })
}

pub fn unpack_dn(reader: &mut ByteReader<'_>, mode: DnMode) -> Result<Value, ReadError> {
    let bit_count = reader.read_u16()? as usize;
    let bytes = reader.take(bit_count.div_ceil(8))?;

    Ok(match mode {
        DnMode::Hex => Value::Str(bits::to_upper_hex(bytes)),
        DnMode::Positions => Value::Positions(bits::set_bit_positions(bytes)),
    })
}

/// Reads `count` consecutive elements of `element`.
pub fn unpack_array(
    reader: &mut ByteReader<'_>,
    element: WireType,
    count: usize,
) -> Result<Value, ReadError> {
    // Every element takes at least one byte.
    let mut values = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        values.push(unpack_field(reader, element, 0)?);
    }

    Ok(Value::Array(values))
}

/// Reads `count` nibbles packed two per byte, low nibble first.
pub fn unpack_xn1(reader: &mut ByteReader<'_>, count: usize) -> Result<Value, ReadError> {
    let bytes = reader.take(count.div_ceil(2))?;

    Ok(Value::Array(
        bits::unpack_nibbles(bytes, count)
            .into_iter()
            .map(|nibble| Value::Int(nibble as i64))
            .collect(),
    ))
}
