//! Missing-value rules: conditions under which a decoded field counts as "not provided".
//!
//! Rules are written as short text in record tables (`"65535"`, `"space"`,
//! `"length byte = 0"`, `"rtn_icnt = 0"`, `"opt_flag bit 4 or 6 = 1"`), parsed once into a
//! [MissingRule] and then compiled against the record's field order into a [CompiledMissing],
//! which is what runs for every decoded record.

use std::fmt;

use crate::{bits, value::Value};

/// A parsed missing-value rule, still referring to sibling fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MissingRule {
    #[default]
    None,
    /// Absent when the value equals this integer.
    Exact(i64),
    /// Absent when the value is a single space.
    Blank,
    /// Absent when the value is empty (zero length byte or zero count).
    LengthZero,
    /// Absent when the named count field decoded to 0.
    CountZero(String),
    /// Absent when any of `bits` (LSB-0) of the named flag field equals `expected`.
    BitCondition {
        flag: String,
        bits: Vec<u8>,
        expected: u8,
    },
}

impl MissingRule {
    /// Parses rule text. The empty string means no rule; `None` means the text is not a rule.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.is_empty() {
            return Some(MissingRule::None);
        }
        if text == "space" {
            return Some(MissingRule::Blank);
        }
        if let Ok(sentinel) = text.parse::<i64>() {
            return Some(MissingRule::Exact(sentinel));
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            ["length", "byte", "=", "0"] => Some(MissingRule::LengthZero),
            [field, "=", "0"] if is_field_name(field) => {
                Some(MissingRule::CountZero(field.to_string()))
            }
            [flag, "bit", rest @ ..] if is_field_name(flag) => parse_bit_condition(flag, rest),
            _ => None,
        }
    }

    /// Sibling field this rule reads, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            MissingRule::CountZero(field) => Some(field),
            MissingRule::BitCondition { flag, .. } => Some(flag),
            _ => None,
        }
    }
}

/// Parses `4 or 6 = 1` (the part after `<flag> bit`).
fn parse_bit_condition(flag: &str, rest: &[&str]) -> Option<MissingRule> {
    let (expected, positions) = match rest {
        [positions @ .., "=", expected] => (expected, positions),
        _ => return None,
    };

    let expected = match *expected {
        "0" => 0,
        "1" => 1,
        _ => return None,
    };

    let mut bits = Vec::new();
    for (i, token) in positions.iter().enumerate() {
        if i % 2 == 1 {
            if *token != "or" {
                return None;
            }
            continue;
        }
        let bit = token.parse::<u8>().ok().filter(|bit| *bit < 8)?;
        bits.push(bit);
    }

    if bits.is_empty() || positions.len() % 2 == 0 {
        return None;
    }

    Some(MissingRule::BitCondition {
        flag: flag.to_string(),
        bits,
        expected,
    })
}

fn is_field_name(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !token.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for MissingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRule::None => Ok(()),
            MissingRule::Exact(v) => write!(f, "{v}"),
            MissingRule::Blank => f.write_str("space"),
            MissingRule::LengthZero => f.write_str("length byte = 0"),
            MissingRule::CountZero(field) => write!(f, "{field} = 0"),
            MissingRule::BitCondition {
                flag,
                bits,
                expected,
            } => {
                write!(f, "{flag} bit ")?;
                for (i, bit) in bits.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{bit}")?;
                }
                write!(f, " = {expected}")
            }
        }
    }
}

/// A missing-value rule with sibling references resolved to field indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompiledMissing {
    #[default]
    None,
    Exact(i64),
    Blank,
    LengthZero,
    CountZero {
        field: usize,
        name: String,
    },
    BitCondition {
        flag: usize,
        name: String,
        bits: Vec<u8>,
        expected: u8,
    },
}

impl CompiledMissing {
    /// Returns `value`, or [Value::Absent] when the rule says the field was not provided.
    ///
    /// `decoded` holds the record's values so far, indexed like the schema's fields.
    /// Absent values stay absent.
    pub fn apply(&self, value: Value, decoded: &[Value]) -> Value {
        if value.is_absent() {
            return value;
        }

        let missing = match self {
            CompiledMissing::None => false,
            CompiledMissing::Exact(sentinel) => match &value {
                Value::Int(v) => v == sentinel,
                Value::Float(v) => *v == *sentinel as f64,
                _ => false,
            },
            CompiledMissing::Blank => value.as_str() == Some(" "),
            CompiledMissing::LengthZero => value.is_empty(),
            CompiledMissing::CountZero { field, .. } => {
                decoded.get(*field).and_then(Value::as_int) == Some(0)
            }
            CompiledMissing::BitCondition {
                flag,
                name,
                bits,
                expected,
            } => match decoded.get(*flag).and_then(Value::as_str) {
                Some(flag_value) => any_bit_matches(flag_value, name, bits, *expected),
                None => {
                    tracing::warn!(flag = %name, "flag field not decoded; missing-value rule skipped");
                    false
                }
            },
        };

        if missing { Value::Absent } else { value }
    }
}

fn any_bit_matches(flag_value: &str, name: &str, bits: &[u8], expected: u8) -> bool {
    for bit in bits {
        match bits::flag_bit(flag_value, *bit) {
            Some(actual) if actual == expected => return true,
            Some(_) => {}
            None => {
                tracing::warn!(flag = %name, value = %flag_value, bit, "flag field is not a binary string");
                return false;
            }
        }
    }

    false
}
