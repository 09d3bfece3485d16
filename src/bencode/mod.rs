//! Bencode value model and encoder.

mod bvalue;
mod encoder;

pub use bvalue::BValue;
