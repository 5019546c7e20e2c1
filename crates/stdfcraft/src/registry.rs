//! Registry: lookup of record schemas by `(rec_typ, rec_sub)` pair or by name.

use std::collections::HashMap;

use crate::{
    errors::{CompileError, LookupError},
    reader::Endianness,
    record::DecodedRecord,
    schema::Schema,
    stdf_v4,
};

/// A set of record schemas. Build it once, then share it read-only between decoders.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: Vec<Schema>,
    by_kind: HashMap<(u8, u8), usize>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry of all STDF V4 record kinds.
    pub fn stdf_v4() -> Result<Self, CompileError> {
        let mut registry = Registry::new();
        for spec in stdf_v4::RECORDS {
            registry.insert(spec.compile()?)?;
        }

        Ok(registry)
    }

    /// Adds a schema. Fails if its name or kind pair is already registered.
    pub fn insert(&mut self, schema: Schema) -> Result<(), CompileError> {
        if self.by_name.contains_key(schema.name()) || self.by_kind.contains_key(&schema.kind()) {
            return Err(CompileError::DuplicateRecordKind(schema.name().to_string()));
        }

        let index = self.schemas.len();
        self.by_kind.insert(schema.kind(), index);
        self.by_name.insert(schema.name().to_string(), index);
        self.schemas.push(schema);

        Ok(())
    }

    pub fn resolve(&self, rec_typ: u8, rec_sub: u8) -> Result<&Schema, LookupError> {
        self.by_kind
            .get(&(rec_typ, rec_sub))
            .map(|i| &self.schemas[*i])
            .ok_or(LookupError::NotFoundKind { rec_typ, rec_sub })
    }

    pub fn resolve_name(&self, name: &str) -> Result<&Schema, LookupError> {
        self.by_name
            .get(name)
            .map(|i| &self.schemas[*i])
            .ok_or_else(|| LookupError::NotFoundName(name.to_string()))
    }

    /// Record kind names in registration order.
    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(Schema::name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Resolves the record kind and decodes `payload` with its schema.
    pub fn decode(
        &self,
        rec_typ: u8,
        rec_sub: u8,
        payload: &[u8],
        endianness: Endianness,
    ) -> Result<DecodedRecord<'_>, LookupError> {
        Ok(self.resolve(rec_typ, rec_sub)?.decode(payload, endianness))
    }
}

#[cfg(feature = "serde")]
impl Registry {
    /// Builds a registry from a JSON [crate::serde::RegistryDef].
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let def: crate::serde::RegistryDef =
            serde_json::from_str(json).map_err(|e| CompileError::InvalidDefinition(e.to_string()))?;
        Registry::try_from(def)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::RegistryDef> for Registry {
    type Error = CompileError;

    fn try_from(value: crate::serde::RegistryDef) -> Result<Self, Self::Error> {
        let mut registry = Registry::new();
        for record in value.records {
            registry.insert(Schema::try_from(record)?)?;
        }

        Ok(registry)
    }
}
