//! Decoded records: field values of one record, in schema order.

use crate::{errors::ReadError, schema::Schema, value::Value};

/// How decoding of a record ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Every field was decoded, or the payload ran out exactly on a field boundary.
    Complete,
    /// A field needed more bytes than the payload held. Fields from `field` on are absent.
    Truncated { field: String, error: ReadError },
}

/// Values of one decoded record. Fields that were never reached are [Value::Absent].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord<'s> {
    schema: &'s Schema,
    values: Vec<Value>,
    status: DecodeStatus,
}

impl<'s> DecodedRecord<'s> {
    pub(crate) fn new(schema: &'s Schema, values: Vec<Value>, status: DecodeStatus) -> Self {
        Self {
            schema,
            values,
            status,
        }
    }

    /// Record kind name, e.g. `PTR`.
    pub fn kind(&self) -> &'s str {
        self.schema.name()
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn status(&self) -> &DecodeStatus {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == DecodeStatus::Complete
    }

    /// Value of the field called `name`; `None` if the schema has no such field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    /// Field names and values in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&'s str, &Value)> + '_ {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    /// Names of the fields that hold a value.
    pub fn present(&self) -> impl Iterator<Item = &'s str> + '_ {
        self.iter()
            .filter(|(_, v)| !v.is_absent())
            .map(|(name, _)| name)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DecodedRecord<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
