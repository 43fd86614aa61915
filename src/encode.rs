use std::io::Write;

use super::error::EncodeError;
use super::value::Value;

/// Encodes a bencode value to a byte vector.
///
/// The output follows the bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys in insertion order, not sorted)
///
/// Unlike decoding, encoding applies no depth limit: the tree is finite and
/// owned by the caller, so there is no adversarial nesting to guard against.
///
/// # Errors
///
/// Encoding a [`Value`] into memory does not fail; the `Result` mirrors
/// [`encode_to`], whose writer may.
///
/// # Examples
///
/// ```
/// use rbencode::{encode, Dict, Value};
///
/// assert_eq!(encode(&Value::Integer(-1)).unwrap(), b"i-1e");
/// assert_eq!(encode(&Value::string("string")).unwrap(), b"6:string");
///
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
/// assert_eq!(encode(&list).unwrap(), b"li1ei2ee");
///
/// let mut dict = Dict::new();
/// dict.insert("key", Value::Integer(10));
/// assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d3:keyi10ee");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_value(value, &mut buf)?;
    Ok(buf)
}

/// Encodes a bencode value into `writer`.
///
/// Partial output may have been written when an error is returned.
pub fn encode_to<W: Write>(value: &Value, mut writer: W) -> Result<(), EncodeError> {
    encode_value(value, &mut writer)
}

fn encode_value<W: Write>(value: &Value, writer: &mut W) -> Result<(), EncodeError> {
    match value {
        Value::Integer(i) => {
            write!(writer, "i{}e", i)?;
        }
        Value::Bytes(b) => encode_bytes(b, writer)?,
        Value::List(l) => {
            writer.write_all(b"l")?;
            for item in l {
                encode_value(item, writer)?;
            }
            writer.write_all(b"e")?;
        }
        Value::Dict(d) => {
            writer.write_all(b"d")?;
            for (key, val) in d {
                encode_bytes(key, writer)?;
                encode_value(val, writer)?;
            }
            writer.write_all(b"e")?;
        }
    }
    Ok(())
}

fn encode_bytes<W: Write>(bytes: &[u8], writer: &mut W) -> Result<(), EncodeError> {
    write!(writer, "{}:", bytes.len())?;
    writer.write_all(bytes)?;
    Ok(())
}
