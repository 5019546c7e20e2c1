//! Schema: compiled payload fields of one record kind, used to decode record payloads.

use std::collections::HashMap;

use crate::{
    errors::CompileError,
    field::{CompiledField, Field},
    reader::{ByteReader, Endianness},
    record::{DecodeStatus, DecodedRecord},
    unpack,
    value::Value,
};

/// A compiled record schema. Use [Schema::compile] to build one from [Field]s, then
/// [Schema::decode] to decode payloads.
///
/// Only payload fields are listed; `rec_len`, `rec_typ` and `rec_sub` belong to the record
/// header (see [crate::stream::RecordHeader]). A schema is never modified by decoding and can
/// be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    rec_typ: u8,
    rec_sub: u8,
    index: HashMap<String, usize>,
    fields: Vec<CompiledField>,
}

impl Schema {
    /// Compiles `fields` into a schema for the `(rec_typ, rec_sub)` record kind. Fails if any
    /// field is invalid or references a field that is not declared before it.
    pub fn compile(
        name: impl Into<String>,
        rec_typ: u8,
        rec_sub: u8,
        fields: &[Field],
    ) -> Result<Self, CompileError> {
        let mut compiled_fields: Vec<CompiledField> = Vec::with_capacity(fields.len());

        for field in fields {
            let compiled_field = CompiledField::compile(field, &compiled_fields)?;
            compiled_fields.push(compiled_field);
        }

        let index = compiled_fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Ok(Self {
            name: name.into(),
            rec_typ,
            rec_sub,
            index,
            fields: compiled_fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(rec_typ, rec_sub)` pair identifying this record kind.
    pub fn kind(&self) -> (u8, u8) {
        (self.rec_typ, self.rec_sub)
    }

    /// Compiled fields in definition order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    /// Decodes one record payload.
    ///
    /// Decoding stops without error when the payload runs out, leaving the remaining fields
    /// absent. A field that needs more bytes than are left stops decoding and is reported in
    /// the record's [DecodeStatus]; fields decoded before it are kept.
    pub fn decode<'s>(&'s self, payload: &[u8], endianness: Endianness) -> DecodedRecord<'s> {
        let mut values = vec![Value::Absent; self.fields.len()];
        let mut reader = ByteReader::new(payload, endianness);
        let mut status = DecodeStatus::Complete;

        if payload.is_empty() && !self.fields.is_empty() {
            tracing::debug!(record = %self.name, "empty payload, no fields decoded");
        }

        for (i, field) in self.fields.iter().enumerate() {
            if reader.is_exhausted() {
                tracing::debug!(
                    record = %self.name,
                    field = %field.name,
                    offset = reader.position(),
                    "payload exhausted, remaining fields absent"
                );
                break;
            }

            let count = match field.array_len {
                Some(len_index) => match values.get(len_index).and_then(Value::as_count) {
                    Some(count) => count,
                    None => {
                        tracing::warn!(
                            record = %self.name,
                            field = %field.name,
                            count_field = %self.fields[len_index].name,
                            "array length not available, field skipped"
                        );
                        continue;
                    }
                },
                None => 0,
            };

            let offset = reader.position();
            let raw = match unpack::unpack_field(&mut reader, field.wire, count) {
                Ok(raw) => raw,
                Err(error) => {
                    tracing::warn!(
                        record = %self.name,
                        field = %field.name,
                        wire = %field.wire,
                        offset,
                        len = payload.len(),
                        error = %error,
                        "field decode failed, record truncated"
                    );
                    status = DecodeStatus::Truncated {
                        field: field.name.clone(),
                        error,
                    };
                    break;
                }
            };

            let value = field.missing.apply(raw, &values);
            values[i] = value;
        }

        DecodedRecord::new(self, values, status)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::RecordDef> for Schema {
    type Error = CompileError;

    fn try_from(value: crate::serde::RecordDef) -> Result<Self, Self::Error> {
        let fields = value
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Schema::compile(value.name, value.rec_typ, value.rec_sub, &fields)
    }
}
