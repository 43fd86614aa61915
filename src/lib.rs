//! rbencode - Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! ```
//! use rbencode::{decode, Value};
//!
//! let value = decode(b"i42e").unwrap().unwrap();
//! assert_eq!(value.as_integer(), Some(42));
//!
//! let value = decode(b"d3:foo3:bare").unwrap().unwrap();
//! assert_eq!(value.get(b"foo").and_then(Value::as_str), Some("bar"));
//!
//! // Empty input is "no value", not an error.
//! assert_eq!(decode(b"").unwrap(), None);
//! ```
//!
//! ## Encoding bencode data
//!
//! ```
//! use rbencode::{encode, Dict, Value};
//!
//! let mut info = Dict::new();
//! info.insert("name", Value::string("example.txt"));
//! info.insert("length", Value::Integer(1024));
//!
//! let encoded = encode(&Value::Dict(info)).unwrap();
//! assert_eq!(encoded, b"d4:name11:example.txt6:lengthi1024ee");
//! ```
//!
//! Dictionaries keep insertion order and are encoded in that order; keys are
//! not sorted.
//!
//! ## Encoding Rust types
//!
//! Any `Serialize` type can be converted with [`to_value`] or encoded
//! directly with [`to_bytes`]. Types with no bencode representation, such as
//! floats or booleans, are rejected with [`EncodeError::Unsupported`].
//!
//! # Nesting limit
//!
//! Decoding rejects input whose lists and dictionaries nest deeper than a
//! limit, [`DEFAULT_MAX_DEPTH`] unless changed. The process-wide limit is read
//! with [`max_depth`] and changed with [`set_max_depth`]; a [`Decoder`] carries
//! its own limit and is unaffected by later changes.
//!
//! # Error Handling
//!
//! Every [`DecodeError`] other than I/O carries the byte offset where the
//! problem was found:
//!
//! - [`DecodeError::UnexpectedEnd`] - Input ended inside an element
//! - [`DecodeError::Malformed`] - Unexpected byte inside an integer or dictionary
//! - [`DecodeError::InvalidStringLength`] - Bad string length prefix
//! - [`DecodeError::IntegerOverflow`] - Integer does not fit in 64 bits
//! - [`DecodeError::KeyNotString`] - Dictionary key is not a byte string
//! - [`DecodeError::UnknownElement`] - Byte that starts no element
//! - [`DecodeError::TrailingGarbage`] - Extra data after the value
//! - [`DecodeError::TooDeep`] - Nesting limit exceeded
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod config;
mod decode;
mod dict;
mod encode;
mod error;
mod ser;
mod value;

pub use config::{max_depth, set_max_depth, DepthLimit, DEFAULT_MAX_DEPTH};
pub use decode::{decode, decode_bytes, decode_file, decode_from, Decoder};
pub use dict::{Dict, Iter};
pub use encode::{encode, encode_to};
pub use error::{ConfigError, DecodeError, EncodeError, Structure};
pub use ser::{to_bytes, to_value};
pub use value::Value;
