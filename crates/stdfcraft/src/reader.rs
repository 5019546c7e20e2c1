//! Endianness-aware byte cursor over a single record payload.

use crate::errors::ReadError;

/// Byte order of every multi-byte field in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    Big,
    #[default]
    Little,
}

impl Endianness {
    /// Maps the FAR `cpu_type` byte to a byte order: 1 is big-endian, anything else little-endian.
    pub fn from_cpu_type(cpu_type: u8) -> Self {
        if cpu_type == 1 {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// Cursor that reads fixed-width values out of `data`, never past its end.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endianness: Endianness,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            pos: 0,
            endianness,
        }
    }

    /// Starts reading at `offset` instead of 0.
    pub fn at(data: &'a [u8], endianness: Endianness, offset: usize) -> Self {
        Self {
            data,
            pos: offset,
            endianness,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Borrows the next `n` bytes and advances past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(ReadError::OutOfBounds {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            })?;

        let bytes = &self.data[self.pos..end];
        self.pos = end;

        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let bytes = self.take_array::<2>()?;
        Ok(match self.endianness {
            Endianness::Big => u16::from_be_bytes(bytes),
            Endianness::Little => u16::from_le_bytes(bytes),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let bytes = self.take_array::<4>()?;
        Ok(match self.endianness {
            Endianness::Big => u32::from_be_bytes(bytes),
            Endianness::Little => u32::from_le_bytes(bytes),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, ReadError> {
        let bytes = self.take_array::<8>()?;
        Ok(match self.endianness {
            Endianness::Big => f64::from_be_bytes(bytes),
            Endianness::Little => f64::from_le_bytes(bytes),
        })
    }
}
