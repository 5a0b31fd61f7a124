//! Payload values captured by case constructors.
//!
//! A [`Payload`] is the ordered list of positional arguments a template
//! case was built with, preserved verbatim on the error for structured
//! logging and assertions. Values are plain data: numbers, booleans,
//! strings, and byte blobs.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── PayloadValue ────────────────────────────────────────────────────────────

/// One positional argument captured at error construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PayloadValue {
    /// Unsigned integer, widened to 128 bits.
    Uint(u128),
    /// Signed integer, widened to 128 bits.
    Int(i128),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
    /// UTF-8 string.
    Str(String),
    /// Raw bytes, displayed as 0x-prefixed hex.
    Bytes(Vec<u8>),
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
        }
    }
}

macro_rules! impl_from_uint {
    ($($ty:ty),+) => {
        $(impl From<$ty> for PayloadValue {
            fn from(value: $ty) -> Self {
                Self::Uint(value as u128)
            }
        })+
    };
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(impl From<$ty> for PayloadValue {
            fn from(value: $ty) -> Self {
                Self::Int(value as i128)
            }
        })+
    };
}

impl_from_uint!(u8, u16, u32, u64, u128, usize);
impl_from_int!(i8, i16, i32, i64, i128, isize);

impl From<f32> for PayloadValue {
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<u8>> for PayloadValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for PayloadValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// Ordered positional payload of one error, in constructor-argument order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload(Vec<PayloadValue>);

impl Payload {
    /// The empty payload, carried by every fixed-message error.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no values were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`, or `None` past the end. Templates rendering over
    /// a payload shorter than their declared arity go through here.
    pub fn get(&self, index: usize) -> Option<&PayloadValue> {
        self.0.get(index)
    }

    /// All captured values as a slice.
    pub fn values(&self) -> &[PayloadValue] {
        &self.0
    }

    /// Iterator over the captured values.
    pub fn iter(&self) -> std::slice::Iter<'_, PayloadValue> {
        self.0.iter()
    }
}

impl From<Vec<PayloadValue>> for Payload {
    fn from(values: Vec<PayloadValue>) -> Self {
        Self(values)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

macro_rules! impl_from_tuple {
    ($(($($name:ident: $idx:tt),+)),+ $(,)?) => {
        $(impl<$($name: Into<PayloadValue>),+> From<($($name,)+)> for Payload {
            fn from(values: ($($name,)+)) -> Self {
                Self(vec![$(values.$idx.into()),+])
            }
        })+
    };
}

impl_from_tuple!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
);

impl FromIterator<PayloadValue> for Payload {
    fn from_iter<I: IntoIterator<Item = PayloadValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::ops::Index<usize> for Payload {
    type Output = PayloadValue;

    fn index(&self, index: usize) -> &PayloadValue {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = &'a PayloadValue;
    type IntoIter = std::slice::Iter<'a, PayloadValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

/// Build a [`Payload`] from a comma-separated list of values.
///
/// Each value goes through `PayloadValue::from`, so integers, floats,
/// booleans, strings, and byte vectors mix freely:
///
/// ```rust
/// use errfamily_core::{payload, PayloadValue};
///
/// let p = payload![404, "users", true];
/// assert_eq!(p.len(), 3);
/// assert_eq!(p[1], PayloadValue::from("users"));
/// ```
#[macro_export]
macro_rules! payload {
    () => {
        $crate::Payload::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Payload::from(vec![$($crate::PayloadValue::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_each_variant() {
        assert_eq!(PayloadValue::from(42u32).to_string(), "42");
        assert_eq!(PayloadValue::from(-7).to_string(), "-7");
        assert_eq!(PayloadValue::from(1.5).to_string(), "1.5");
        assert_eq!(PayloadValue::from(true).to_string(), "true");
        assert_eq!(PayloadValue::from("shard-1").to_string(), "shard-1");
        assert_eq!(
            PayloadValue::from(vec![0xde, 0xad]).to_string(),
            "0xdead"
        );
    }

    #[test]
    fn payload_macro_mixes_types() {
        let p = payload![404, "users", true];
        assert_eq!(p.len(), 3);
        assert_eq!(p[0], PayloadValue::Int(404));
        assert_eq!(p[1], PayloadValue::Str("users".into()));
        assert_eq!(p[2], PayloadValue::Bool(true));
    }

    #[test]
    fn tuples_of_convertible_values_build_payloads() {
        let p = Payload::from((404u32, "users"));
        assert_eq!(
            p.values(),
            &[PayloadValue::Uint(404), PayloadValue::Str("users".into())]
        );

        assert_eq!(Payload::from((true,)).values(), &[PayloadValue::Bool(true)]);
        assert_eq!(Payload::from((1, 2.5, "x", false)).len(), 4);
    }

    #[test]
    fn empty_macro_matches_empty() {
        assert_eq!(payload![], Payload::empty());
        assert!(payload![].is_empty());
    }

    #[test]
    fn get_past_the_end_is_none() {
        let p = payload![1];
        assert!(p.get(0).is_some());
        assert!(p.get(1).is_none());
    }

    #[test]
    fn display_joins_values() {
        assert_eq!(payload![1, "a"].to_string(), "[1, a]");
        assert_eq!(Payload::empty().to_string(), "[]");
    }

    #[test]
    fn iteration_yields_values_in_order() {
        let p = payload![1, "a"];
        let rendered: Vec<String> = p.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1", "a"]);

        let mut seen = Vec::new();
        for value in &p {
            seen.push(value.to_string());
        }
        assert_eq!(seen, rendered);
    }

    #[test]
    fn serde_round_trip_preserves_tags() {
        let p = payload![404u32, "users"];
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json[0]["type"], "uint");
        assert_eq!(json[0]["value"], 404);
        assert_eq!(json[1]["type"], "str");
        assert_eq!(json[1]["value"], "users");

        let back: Payload = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
