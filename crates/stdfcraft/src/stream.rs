//! Record stream: splits an STDF byte stream into record headers and raw payloads.
//!
//! Every record starts with a 4-byte header (`rec_len: U*2`, `rec_typ: U*1`,
//! `rec_sub: U*1`) in the file's byte order, followed by `rec_len` payload bytes. The byte
//! order is taken from the `cpu_type` byte of the first record (FAR), at file offset 4.

use std::io::{self, Read};

use crate::{
    errors::LookupError,
    reader::Endianness,
    record::DecodedRecord,
    registry::Registry,
};

pub const HEADER_LEN: usize = 4;

/// File offset of the FAR `cpu_type` byte.
pub const CPU_TYPE_OFFSET: usize = 4;

/// Errors produced while reading records out of a byte stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The stream ended inside a record payload.
    #[error(
        "record rec_typ={rec_typ}, rec_sub={rec_sub} at offset {offset}: expected {expected} payload bytes, got {got}"
    )]
    ShortPayload {
        rec_typ: u8,
        rec_sub: u8,
        offset: u64,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Payload length in bytes, header excluded.
    pub rec_len: u16,
    pub rec_typ: u8,
    pub rec_sub: u8,
}

impl RecordHeader {
    pub fn parse(bytes: [u8; HEADER_LEN], endianness: Endianness) -> Self {
        let len_bytes = [bytes[0], bytes[1]];
        let rec_len = match endianness {
            Endianness::Big => u16::from_be_bytes(len_bytes),
            Endianness::Little => u16::from_le_bytes(len_bytes),
        };

        RecordHeader {
            rec_len,
            rec_typ: bytes[2],
            rec_sub: bytes[3],
        }
    }

    pub fn kind(&self) -> (u8, u8) {
        (self.rec_typ, self.rec_sub)
    }
}

/// Byte order of a file, given at least its first 5 bytes.
pub fn detect_endianness(file_start: &[u8]) -> Option<Endianness> {
    file_start
        .get(CPU_TYPE_OFFSET)
        .map(|cpu_type| Endianness::from_cpu_type(*cpu_type))
}

/// One record as found in the stream, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub header: RecordHeader,
    /// File offset of the record header.
    pub offset: u64,
    pub payload: Vec<u8>,
}

impl RawRecord {
    /// Decodes the payload with the schema registered for this record's kind.
    pub fn decode<'r>(
        &self,
        registry: &'r Registry,
        endianness: Endianness,
    ) -> Result<DecodedRecord<'r>, LookupError> {
        registry.decode(
            self.header.rec_typ,
            self.header.rec_sub,
            &self.payload,
            endianness,
        )
    }
}

/// Iterator over the records of one STDF stream.
pub struct RecordStream<R> {
    reader: R,
    endianness: Endianness,
    offset: u64,
    pending: Option<RawRecord>,
    carry: Option<u8>,
    done: bool,
}

impl<R: Read> RecordStream<R> {
    /// Reads records with a known byte order.
    pub fn new(reader: R, endianness: Endianness) -> Self {
        Self {
            reader,
            endianness,
            offset: 0,
            pending: None,
            carry: None,
            done: false,
        }
    }

    /// Reads the first record to find the file's byte order, then streams every record,
    /// the first one included.
    pub fn open(mut reader: R) -> Result<Self, StreamError> {
        let mut file_start = [0u8; CPU_TYPE_OFFSET + 1];
        let got = read_fully(&mut reader, &mut file_start)?;
        if got < HEADER_LEN {
            if got > 0 {
                tracing::warn!(got, "incomplete first record header");
            }
            let mut stream = Self::new(reader, Endianness::default());
            stream.done = true;
            return Ok(stream);
        }

        let endianness = detect_endianness(&file_start[..got]).unwrap_or_else(|| {
            tracing::warn!("stream ends before cpu_type, assuming little-endian");
            Endianness::default()
        });
        let cpu_type = file_start[..got].get(CPU_TYPE_OFFSET).copied();
        let header = [file_start[0], file_start[1], file_start[2], file_start[3]];

        let first = RecordHeader::parse(header, endianness);
        if first.kind() != (0, 10) {
            tracing::warn!(
                rec_typ = first.rec_typ,
                rec_sub = first.rec_sub,
                "first record is not FAR, byte order may be wrong"
            );
        }

        let mut stream = Self::new(reader, endianness);
        let mut payload = Vec::with_capacity(first.rec_len as usize);
        if let Some(cpu_type) = cpu_type {
            if first.rec_len > 0 {
                payload.push(cpu_type);
            } else {
                // Empty first payload: the probed byte starts the next header.
                stream.carry = Some(cpu_type);
            }
        }
        stream.offset = (HEADER_LEN + payload.len()) as u64;
        stream.pending = Some(stream.finish_payload(first, 0, payload)?);

        Ok(stream)
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Reads the next record. `Ok(None)` at the end of the stream.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, StreamError> {
        if let Some(record) = self.pending.take() {
            return Ok(Some(record));
        }
        if self.done {
            return Ok(None);
        }

        let record_offset = self.offset;
        let mut header = [0u8; HEADER_LEN];
        let got = match self.carry.take() {
            Some(byte) => {
                header[0] = byte;
                1 + read_fully(&mut self.reader, &mut header[1..])?
            }
            None => read_fully(&mut self.reader, &mut header)?,
        };
        self.offset = record_offset + got as u64;

        if got < HEADER_LEN {
            if got > 0 {
                tracing::warn!(
                    offset = record_offset,
                    got,
                    "incomplete record header at end of stream"
                );
            }
            self.done = true;
            return Ok(None);
        }

        let header = RecordHeader::parse(header, self.endianness);
        let payload = Vec::with_capacity(header.rec_len as usize);
        self.finish_payload(header, record_offset, payload).map(Some)
    }

    /// Reads the rest of a payload of which `payload` already holds the first bytes.
    fn finish_payload(
        &mut self,
        header: RecordHeader,
        record_offset: u64,
        mut payload: Vec<u8>,
    ) -> Result<RawRecord, StreamError> {
        let expected = header.rec_len as usize;
        let start = payload.len();
        payload.resize(expected.max(start), 0);

        let got = start + read_fully(&mut self.reader, &mut payload[start..])?;
        self.offset += (got - start) as u64;

        if got < expected {
            self.done = true;
            return Err(StreamError::ShortPayload {
                rec_typ: header.rec_typ,
                rec_sub: header.rec_sub,
                offset: record_offset,
                expected,
                got,
            });
        }

        Ok(RawRecord {
            header,
            offset: record_offset,
            payload,
        })
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<RawRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Reads until `buf` is full or the stream ends. Returns the number of bytes read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
