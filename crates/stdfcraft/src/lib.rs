//! # stdfcraft
//!
//! A library for decoding STDF V4 (Standard Test Data Format) records using declarative
//! schemas.
//!
//! Each record kind is described as an ordered list of payload fields with a wire type, an
//! optional reference to the earlier field holding its array length, and a missing-value rule
//! ("absent if `opt_flag` bit 4 or 6 is set"). Schemas are compiled once, then decode record
//! payloads into name → value maps in either byte order. Built-in tables cover every STDF V4
//! record; further kinds can be added in code or, with the `serde` feature, from JSON.
//!
//! ## Example
//!
//! ```
//! use stdfcraft::reader::Endianness;
//! use stdfcraft::registry::Registry;
//! use stdfcraft::value::Value;
//!
//! let registry = Registry::stdf_v4().unwrap();
//!
//! // PIR (5, 10): head_num = 1, site_num = 3
//! let record = registry.decode(5, 10, &[0x01, 0x03], Endianness::Little).unwrap();
//! assert_eq!(record.kind(), "PIR");
//! assert_eq!(record.get("site_num"), Some(&Value::Int(3)));
//!
//! // PTR (15, 10) cut short after test_flg: later fields stay absent.
//! let payload = [0x64, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00];
//! let record = registry.decode(15, 10, &payload, Endianness::Little).unwrap();
//! assert!(record.is_complete());
//! assert_eq!(record.get("test_num"), Some(&Value::Int(100)));
//! assert_eq!(record.get("test_flg"), Some(&Value::Str("00000000".to_string())));
//! assert_eq!(record.get("parm_flg"), Some(&Value::Absent));
//! ```

pub mod bits;
pub mod errors;
pub mod field;
pub mod missing;
pub mod reader;
pub mod record;
pub mod registry;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
mod stdf_v4;
pub mod stream;
pub mod unpack;
pub mod value;
pub mod variable;
pub mod wire;
