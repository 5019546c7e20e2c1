//! Error types for schema compilation, schema lookup and payload reading.

/// Errors produced when compiling a [crate::field::Field] list into a [crate::schema::Schema].
///
/// These indicate a schema bug rather than bad input data and are always surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Wire-type tag in a text definition is not one of the known tags.
    #[error("unknown wire type `{0}`")]
    UnknownWireType(String),
    /// Missing-value rule text does not match any recognized pattern.
    #[error("field `{field}`: unrecognized missing-value rule `{rule}`")]
    InvalidMissingRule { field: String, rule: String },
    /// Field name is empty or used twice in the same record.
    #[error("invalid or duplicate field name `{0}`")]
    InvalidFieldName(String),
    /// Array wire type declared without a length reference.
    #[error("array field `{0}` has no length reference")]
    MissingArrayLength(String),
    /// Length reference on a field whose wire type is not an array.
    #[error("scalar field `{0}` cannot take a length reference")]
    UnexpectedArrayLength(String),
    /// Reference to a field that is not declared earlier in the same record.
    #[error("field `{field}` references `{reference}`, which is not declared before it")]
    UnknownReference { field: String, reference: String },
    /// Two schemas share a name or a `(rec_typ, rec_sub)` pair.
    #[error("record kind `{0}` is defined twice")]
    DuplicateRecordKind(String),
    /// JSON schema definition could not be deserialized.
    #[error("invalid schema definition: {0}")]
    InvalidDefinition(String),
}

/// Errors produced when resolving a record kind in a [crate::registry::Registry].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No schema is registered for the `(rec_typ, rec_sub)` pair.
    #[error("no schema for rec_typ={rec_typ}, rec_sub={rec_sub}")]
    NotFoundKind { rec_typ: u8, rec_sub: u8 },
    /// No schema is registered under this record name.
    #[error("no schema named `{0}`")]
    NotFoundName(String),
}

/// Errors produced when reading field bytes out of a record payload.
///
/// The record decoder turns these into a partial record; they never cross the record boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Requested byte range runs past the end of the payload.
    #[error("needed {needed} byte(s) at offset {offset}, payload has {available}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Variable-type element carries a type code outside the known set.
    #[error("unknown variable data type code {code} at offset {offset}")]
    UnknownVariableType { code: u8, offset: usize },
}
