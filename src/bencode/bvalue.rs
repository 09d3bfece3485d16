use std::collections::BTreeMap;
use std::fmt::Display;

/// Represents a Bencode value as defined in the BitTorrent specification.
///
/// Bencode (pronounced like B-encode) supports four different types of values:
/// - Byte strings (represented as raw bytes, not [`String`])
/// - Integers
/// - Lists
/// - Dictionaries
///
/// Dictionaries are backed by a [`BTreeMap`], so entries always come out in
/// byte-wise key order no matter in which order they were inserted.
#[derive(Debug, Clone, PartialEq)]
pub enum BValue {
    /// An integer value, can be positive or negative
    /// Example: `i42e` represents 42
    Integer(i64),

    /// A byte string, prefixed with its length
    /// Example: `4:spam` represents "spam"
    String(Vec<u8>),

    /// A list of BValue elements
    /// Example: `l4:spami42ee` represents ["spam", 42]
    List(Vec<BValue>),

    /// A dictionary mapping strings to BValues
    /// Example: `d3:bar4:spam3:fooi42ee` represents {"bar": "spam", "foo": 42}
    Dict(BTreeMap<String, BValue>),
}

impl From<i64> for BValue {
    fn from(n: i64) -> Self {
        BValue::Integer(n)
    }
}

impl From<u64> for BValue {
    fn from(n: u64) -> Self {
        // Sizes beyond i64::MAX cannot exist on any filesystem we read from.
        BValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for BValue {
    fn from(s: &str) -> Self {
        BValue::String(s.as_bytes().to_vec())
    }
}

impl From<String> for BValue {
    fn from(s: String) -> Self {
        BValue::String(s.into_bytes())
    }
}

impl From<Vec<u8>> for BValue {
    fn from(bytes: Vec<u8>) -> Self {
        BValue::String(bytes)
    }
}

impl From<Vec<BValue>> for BValue {
    fn from(list: Vec<BValue>) -> Self {
        BValue::List(list)
    }
}

impl From<BTreeMap<String, BValue>> for BValue {
    fn from(dict: BTreeMap<String, BValue>) -> Self {
        BValue::Dict(dict)
    }
}

impl Display for BValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BValue::Integer(n) => write!(f, "{}", n),
            BValue::String(s) => {
                if s.iter().any(|&b| b < 32 || b > 126) {
                    write!(f, "\"{}\"", hex::encode(s))
                } else {
                    let string = String::from_utf8_lossy(s);
                    write!(f, "\"{}\"", string)
                }
            }
            BValue::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            BValue::Dict(dict) => {
                write!(f, "{{")?;
                for (i, (key, value)) in dict.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{}\":{}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl BValue {
    /// Bencodes this value.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = crate::bencode::encoder::Encoder::new();
        encoder.encode(self)
    }
}
