//! Conversion of arbitrary `Serialize` types into bencode values.
//!
//! Only types that map onto the four bencode shapes are accepted. Everything
//! else fails here, at the conversion boundary, with an [`EncodeError`] naming
//! the offending type, so that [`encode`] itself only ever sees a [`Value`].
//!
//! | Rust / serde type                     | Bencode                              |
//! |---------------------------------------|--------------------------------------|
//! | integers fitting `i64`                | integer                              |
//! | `str`, `char`, bytes, unit variants   | byte string                          |
//! | sequences, tuples                     | list                                 |
//! | maps, structs                         | dictionary, in entry order           |
//! | `Some(v)`, newtype structs            | `v`                                  |
//! | variants with data                    | `{variant: data}`                    |
//! | `bool`, floats, `None`, `()`          | error                                |

use bytes::Bytes;
use serde::ser::{self, Impossible, Serialize, SerializeMap, SerializeSeq};

use super::dict::Dict;
use super::encode::encode;
use super::error::EncodeError;
use super::value::Value;

/// Converts `value` into a bencode [`Value`].
///
/// ```
/// use rbencode::{to_value, Value};
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("key", 10);
/// let value = to_value(&map).unwrap();
/// assert_eq!(value.get(b"key"), Some(&Value::Integer(10)));
///
/// assert!(to_value(&1.5f64).is_err());
/// ```
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    value.serialize(ValueSerializer)
}

/// Converts `value` into a bencode [`Value`] and encodes it.
///
/// ```
/// use rbencode::to_bytes;
///
/// assert_eq!(to_bytes(&1).unwrap(), b"i1e");
/// assert_eq!(to_bytes("string").unwrap(), b"6:string");
/// assert_eq!(to_bytes(&vec![1, 2]).unwrap(), b"li1ei2ee");
/// ```
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode(&to_value(value)?)
}

fn unsupported(type_name: &'static str) -> EncodeError {
    EncodeError::Unsupported { type_name }
}

fn out_of_range(v: impl ToString) -> EncodeError {
    EncodeError::IntegerOutOfRange(v.to_string())
}

fn single_entry(variant: &'static str, value: Value) -> Value {
    let mut dict = Dict::with_capacity(1);
    dict.insert(variant, value);
    Value::Dict(dict)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, _v: bool) -> Result<Value, EncodeError> {
        Err(unsupported("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, EncodeError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, EncodeError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_f32(self, _v: f32) -> Result<Value, EncodeError> {
        Err(unsupported("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Value, EncodeError> {
        Err(unsupported("f64"))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        let mut buf = [0u8; 4];
        Ok(Value::string(v.encode_utf8(&mut buf)))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::Bytes(Bytes::copy_from_slice(v)))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Err(unsupported("None"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Err(unsupported("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, EncodeError> {
        Err(unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::string(variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        Ok(single_entry(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, EncodeError> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantSerializer, EncodeError> {
        Ok(TupleVariantSerializer {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer, EncodeError> {
        Ok(MapSerializer {
            dict: Dict::with_capacity(len.unwrap_or(0)),
            key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<MapSerializer, EncodeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantSerializer, EncodeError> {
        Ok(StructVariantSerializer {
            variant,
            dict: Dict::with_capacity(len),
        })
    }
}

struct SeqSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

struct TupleVariantSerializer {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(single_entry(self.variant, Value::List(self.items)))
    }
}

struct MapSerializer {
    dict: Dict,
    key: Option<Bytes>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .key
            .take()
            .ok_or_else(|| EncodeError::Custom("map value serialized before its key".into()))?;
        self.dict.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Dict(self.dict))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.dict.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Dict(self.dict))
    }
}

struct StructVariantSerializer {
    variant: &'static str,
    dict: Dict,
}

impl ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.dict.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(single_entry(self.variant, Value::Dict(self.dict)))
    }
}

/// Serializer for dictionary keys: only string-like scalars are accepted.
struct KeySerializer;

fn bad_key(type_name: &'static str) -> EncodeError {
    EncodeError::KeyMustBeString { type_name }
}

impl ser::Serializer for KeySerializer {
    type Ok = Bytes;
    type Error = EncodeError;

    type SerializeSeq = Impossible<Bytes, EncodeError>;
    type SerializeTuple = Impossible<Bytes, EncodeError>;
    type SerializeTupleStruct = Impossible<Bytes, EncodeError>;
    type SerializeTupleVariant = Impossible<Bytes, EncodeError>;
    type SerializeMap = Impossible<Bytes, EncodeError>;
    type SerializeStruct = Impossible<Bytes, EncodeError>;
    type SerializeStructVariant = Impossible<Bytes, EncodeError>;

    fn serialize_bool(self, _v: bool) -> Result<Bytes, EncodeError> {
        Err(bad_key("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Bytes, EncodeError> {
        Err(bad_key("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Bytes, EncodeError> {
        Err(bad_key("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Bytes, EncodeError> {
        Err(bad_key("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Bytes, EncodeError> {
        Err(bad_key("i64"))
    }

    fn serialize_i128(self, _v: i128) -> Result<Bytes, EncodeError> {
        Err(bad_key("i128"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Bytes, EncodeError> {
        Err(bad_key("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Bytes, EncodeError> {
        Err(bad_key("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Bytes, EncodeError> {
        Err(bad_key("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Bytes, EncodeError> {
        Err(bad_key("u64"))
    }

    fn serialize_u128(self, _v: u128) -> Result<Bytes, EncodeError> {
        Err(bad_key("u128"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Bytes, EncodeError> {
        Err(bad_key("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Bytes, EncodeError> {
        Err(bad_key("f64"))
    }

    fn serialize_char(self, v: char) -> Result<Bytes, EncodeError> {
        Ok(Bytes::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Bytes, EncodeError> {
        Ok(Bytes::copy_from_slice(v.as_bytes()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Bytes, EncodeError> {
        Ok(Bytes::copy_from_slice(v))
    }

    fn serialize_none(self) -> Result<Bytes, EncodeError> {
        Err(bad_key("None"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<Bytes, EncodeError> {
        Err(bad_key("Option"))
    }

    fn serialize_unit(self) -> Result<Bytes, EncodeError> {
        Err(bad_key("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Bytes, EncodeError> {
        Err(bad_key(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Bytes, EncodeError> {
        Ok(Bytes::from_static(variant.as_bytes()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Bytes, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Bytes, EncodeError> {
        Err(bad_key(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(bad_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(bad_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(bad_key(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(bad_key(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(bad_key("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(bad_key(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(bad_key(name))
    }
}

/// A byte slice that serializes as bytes rather than as a sequence of `u8`.
struct RawBytes<'a>(&'a [u8]);

impl Serialize for RawBytes<'_> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

impl Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for item in l {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(d) => {
                let mut map = serializer.serialize_map(Some(d.len()))?;
                for (key, value) in d {
                    map.serialize_entry(&RawBytes(key), value)?;
                }
                map.end()
            }
        }
    }
}
