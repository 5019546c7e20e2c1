//! JSON-deserializable record definitions.
//!
//! These types describe record layouts that are not part of the built-in STDF V4 tables
//! (vendor records, or a patched copy of a standard one). They are intended to be read from
//! JSON and then compiled into a [crate::registry::Registry] with the same checks as the
//! built-in tables.
//!
//! ```json
//! {
//!   "records": [
//!     {
//!       "name": "VND",
//!       "rec_typ": 180,
//!       "rec_sub": 1,
//!       "fields": [
//!         { "name": "pin_cnt", "wire": "U*2" },
//!         { "name": "pin_idx", "wire": "xU*2", "array_len": "pin_cnt", "missing": "pin_cnt = 0" },
//!         { "name": "bin", "wire": "U*2", "missing": 65535 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level definition: a list of record kinds.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegistryDef {
    pub records: Vec<RecordDef>,
}

/// One record kind and its payload fields, in wire order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecordDef {
    /// Three-letter record name, e.g. `PTR`.
    pub name: String,
    pub rec_typ: u8,
    pub rec_sub: u8,
    /// Payload fields only; the record header is not listed.
    pub fields: Vec<FieldDef>,
}

/// Description of a single payload field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Field name; becomes the key in the decoded record.
    pub name: String,
    /// Wire-type tag such as `U*4`, `C*n` or `xN*1`.
    pub wire: String,
    /// Earlier field holding the element count, for array wire types.
    #[serde(default)]
    pub array_len: Option<String>,
    /// Missing-value rule: an integer sentinel or rule text.
    #[serde(default)]
    pub missing: Option<MissingDef>,
}

/// Missing-value rule as written in JSON.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum MissingDef {
    /// Absent when the value equals this number.
    Sentinel(i64),
    /// Rule text, e.g. `"space"` or `"opt_flag bit 2 = 1"`.
    Rule(String),
}
