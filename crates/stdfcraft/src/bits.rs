//! Bit and nibble helpers shared by the unpackers and the missing-value rules.
//!
//! Flag bytes travel as 8-character binary strings, MSB first. Bit positions
//! used by rules are LSB-0: bit 0 is the last character of that string.

use std::fmt::Write;

/// Formats a flag byte as its 8-character binary string, MSB first.
pub fn format_flag_byte(byte: u8) -> String {
    format!("{byte:08b}")
}

/// Reads bit `bit` (LSB-0) out of a binary flag string. `None` if the string is not binary
/// or the bit lies outside it.
pub fn flag_bit(flag: &str, bit: u8) -> Option<u8> {
    let bytes = flag.as_bytes();
    let index = bytes.len().checked_sub(bit as usize + 1)?;

    match bytes[index] {
        b'0' => Some(0),
        b'1' => Some(1),
        _ => None,
    }
}

/// Lists the 1-based positions of set bits: bytes in order, LSB to MSB within a byte.
pub fn set_bit_positions(data: &[u8]) -> Vec<u32> {
    let mut positions = Vec::new();

    for (byte_index, &byte) in data.iter().enumerate() {
        for bit_index in 0..8 {
            if byte & (1 << bit_index) != 0 {
                positions.push((byte_index * 8 + bit_index + 1) as u32);
            }
        }
    }

    positions
}

/// Uppercase hex of every byte, zero-padded to two digits each.
pub fn to_upper_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{byte:02X}");
    }

    out
}

/// Reads `data` as one big-endian binary number and formats it as uppercase hex without
/// leading zeros. `None` when the number is zero or `data` is empty.
pub fn to_trimmed_hex(data: &[u8]) -> Option<String> {
    let first = data.iter().position(|b| *b != 0)?;

    let mut out = format!("{:X}", data[first]);
    out.push_str(&to_upper_hex(&data[first + 1..]));

    Some(out)
}

/// Low nibble of `byte` as a single uppercase hex digit.
pub fn low_nibble_hex(byte: u8) -> String {
    format!("{:X}", byte & 0x0F)
}

/// Splits `count` nibbles out of `data`, low nibble of each byte first.
pub fn unpack_nibbles(data: &[u8], count: usize) -> Vec<u8> {
    data.iter()
        .flat_map(|byte| [byte & 0x0F, (byte >> 4) & 0x0F])
        .take(count)
        .collect()
}
