//! Field descriptors used to build a [crate::schema::Schema].

use crate::{
    errors::CompileError,
    missing::{CompiledMissing, MissingRule},
    wire::WireType,
};

/// A single named payload field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used in the decoded record.
    pub name: String,
    /// Encoding of the field's bytes.
    pub wire: WireType,
    /// For array wire types: the earlier field holding the element count.
    pub array_len: Option<String>,
    /// When the decoded value means "not provided".
    pub missing: MissingRule,
}

impl Field {
    pub fn new(name: impl Into<String>, wire: WireType) -> Self {
        Field {
            name: name.into(),
            wire,
            array_len: None,
            missing: MissingRule::None,
        }
    }

    pub fn with_array_len(mut self, count_field: impl Into<String>) -> Self {
        self.array_len = Some(count_field.into());
        self
    }

    pub fn with_missing(mut self, missing: MissingRule) -> Self {
        self.missing = missing;
        self
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FieldDef> for Field {
    type Error = CompileError;

    fn try_from(value: crate::serde::FieldDef) -> Result<Self, Self::Error> {
        let missing = match value.missing {
            None => MissingRule::None,
            Some(crate::serde::MissingDef::Sentinel(sentinel)) => MissingRule::Exact(sentinel),
            Some(crate::serde::MissingDef::Rule(text)) => {
                MissingRule::parse(&text).ok_or_else(|| CompileError::InvalidMissingRule {
                    field: value.name.clone(),
                    rule: text.clone(),
                })?
            }
        };

        Ok(Field {
            wire: value.wire.parse()?,
            name: value.name,
            array_len: value.array_len,
            missing,
        })
    }
}

/// A field whose references have been checked and resolved to indices of earlier fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub wire: WireType,
    /// Index of the field holding the element count.
    pub array_len: Option<usize>,
    pub missing: CompiledMissing,
}

impl CompiledField {
    /// Compiles `field` given the fields declared before it in the same record.
    pub fn compile(field: &Field, earlier: &[CompiledField]) -> Result<Self, CompileError> {
        if field.name.is_empty() || earlier.iter().any(|f| f.name == field.name) {
            return Err(CompileError::InvalidFieldName(field.name.clone()));
        }

        let lookup = |reference: &str| {
            earlier
                .iter()
                .position(|f| f.name == reference)
                .ok_or_else(|| CompileError::UnknownReference {
                    field: field.name.clone(),
                    reference: reference.to_string(),
                })
        };

        let array_len = match (&field.array_len, field.wire.needs_count()) {
            (Some(reference), true) => Some(lookup(reference)?),
            (None, true) => return Err(CompileError::MissingArrayLength(field.name.clone())),
            (Some(_), false) => {
                return Err(CompileError::UnexpectedArrayLength(field.name.clone()));
            }
            (None, false) => None,
        };

        let missing = match &field.missing {
            MissingRule::None => CompiledMissing::None,
            MissingRule::Exact(sentinel) => CompiledMissing::Exact(*sentinel),
            MissingRule::Blank => CompiledMissing::Blank,
            MissingRule::LengthZero => CompiledMissing::LengthZero,
            MissingRule::CountZero(name) => CompiledMissing::CountZero {
                field: lookup(name)?,
                name: name.clone(),
            },
            MissingRule::BitCondition {
                flag,
                bits,
                expected,
            } => CompiledMissing::BitCondition {
                flag: lookup(flag)?,
                name: flag.clone(),
                bits: bits.clone(),
                expected: *expected,
            },
        };

        Ok(CompiledField {
            name: field.name.clone(),
            wire: field.wire,
            array_len,
            missing,
        })
    }
}
