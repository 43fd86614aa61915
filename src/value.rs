use bytes::Bytes;

use super::dict::Dict;

/// A bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// This enum is closed over exactly those four shapes; anything else has to be
/// converted into one of them (see [`to_value`](crate::to_value)) before it can
/// be encoded.
///
/// # Examples
///
/// ```
/// use rbencode::Value;
///
/// // Creating values directly
/// let int = Value::Integer(42);
/// let string = Value::string("hello");
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// // Using From implementations
/// let int: Value = 42i64.into();
/// let string: Value = "hello".into();
///
/// // Accessing values
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with byte string keys, in insertion order.
    Dict(Dict),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    ///
    /// ```
    /// use rbencode::Value;
    ///
    /// let value = Value::string("hello");
    /// assert_eq!(value.as_str(), Some("hello"));
    /// ```
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }

    fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Dict(_))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// Returns `None` if the value is not a byte string or if the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the list, if it is one.
    pub fn into_list(mut self) -> Option<Vec<Value>> {
        match &mut self {
            Value::List(l) => Some(std::mem::take(l)),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    ///
    /// This avoids cloning the dictionary when you need ownership.
    pub fn into_dict(mut self) -> Option<Dict> {
        match &mut self {
            Value::Dict(d) => Some(std::mem::take(d)),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or if the key is not present.
    ///
    /// ```
    /// use rbencode::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap().unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }
}

/// Tears containers down through a heap worklist.
///
/// Decoding with [`DepthLimit::Unbounded`](crate::DepthLimit::Unbounded) can
/// build trees far deeper than the native stack; the derived drop would
/// recurse once per level.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = match self {
            Value::List(items) if items.iter().any(Value::is_container) => {
                std::mem::take(items)
            }
            Value::Dict(dict) if dict.values().any(Value::is_container) => dict.take_values(),
            _ => return,
        };

        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::List(items) => pending.append(items),
                Value::Dict(dict) => pending.extend(dict.take_values()),
                _ => {}
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}
