//! Bencode encoder implementation following the BitTorrent protocol specification.
//!
//! This module provides functionality to encode data into the Bencode format as defined in the
//! [BitTorrent protocol specification](http://www.bittorrent.org/beps/bep_0003.html#bencoding).
//!
//! The encoding rules are:
//! - Strings are length-prefixed base10 followed by a colon and the raw bytes
//! - Integers are 'i' followed by the number in base10 followed by 'e'
//! - Lists are 'l' followed by their elements followed by 'e'
//! - Dictionaries are 'd' followed by alternating keys and values followed by 'e'
//!
//! Dictionary keys are emitted in sorted order because [`BValue::Dict`] is a
//! [`BTreeMap`]; callers cannot produce an unsorted dictionary.

use std::collections::BTreeMap;

use crate::bencode::bvalue::BValue;
use tracing::trace;

/// An encoder for converting [`BValue`]s into Bencode bytes.
///
/// The encoder maintains an internal buffer and provides methods to encode
/// different data types according to the Bencode specification. Encoding is
/// total: every `BValue` has exactly one encoding.
pub struct Encoder {
    output: Vec<u8>,
}

impl Encoder {
    /// Creates a new encoder with an empty output buffer.
    pub fn new() -> Self {
        Self { output: Vec::new() }
    }

    /// Encodes a value and hands back the accumulated bytes, leaving the
    /// encoder empty for reuse.
    pub fn encode(&mut self, value: &BValue) -> Vec<u8> {
        self.encode_value(value);
        std::mem::take(&mut self.output)
    }

    fn encode_value(&mut self, value: &BValue) {
        match value {
            BValue::Integer(n) => self.encode_integer(*n),
            BValue::String(s) => self.encode_string(s),
            BValue::List(list) => self.encode_list(list),
            BValue::Dict(dict) => self.encode_dict(dict),
        }
    }

    /// Encodes an integer in the format: i<number>e
    fn encode_integer(&mut self, n: i64) {
        self.output.push(b'i');
        self.output.extend_from_slice(n.to_string().as_bytes());
        self.output.push(b'e');
    }

    /// Encodes a string in the format: <length>:<bytes>
    fn encode_string(&mut self, s: &[u8]) {
        self.output.extend_from_slice(s.len().to_string().as_bytes());
        self.output.push(b':');
        self.output.extend_from_slice(s);
    }

    /// Encodes a list in the format: l<bencoded values>e
    fn encode_list(&mut self, list: &[BValue]) {
        trace!("encoding list of {} items", list.len());
        self.output.push(b'l');
        for item in list {
            self.encode_value(item);
        }
        self.output.push(b'e');
    }

    /// Encodes a dictionary in the format: d<bencoded string><bencoded value>e
    fn encode_dict(&mut self, dict: &BTreeMap<String, BValue>) {
        trace!("encoding dict with {} keys", dict.len());
        self.output.push(b'd');
        for (key, value) in dict {
            self.encode_string(key.as_bytes());
            self.encode_value(value);
        }
        self.output.push(b'e');
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
