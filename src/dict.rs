use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use super::value::Value;

/// A bencode dictionary that keeps its entries in insertion order.
///
/// Re-inserting an existing key replaces its value in place, so the entry
/// keeps the position of its first insertion. Encoding walks entries in this
/// order; no sorting is applied.
///
/// # Examples
///
/// ```
/// use rbencode::{Dict, Value};
///
/// let mut dict = Dict::new();
/// dict.insert("zebra", Value::Integer(1));
/// dict.insert("apple", Value::Integer(2));
/// dict.insert("zebra", Value::Integer(3));
///
/// let keys: Vec<&[u8]> = dict.keys().map(|k| k.as_ref()).collect();
/// assert_eq!(keys, [b"zebra".as_slice(), b"apple".as_slice()]);
/// assert_eq!(dict.get(b"zebra"), Some(&Value::Integer(3)));
/// ```
#[derive(Clone, Default)]
pub struct Dict {
    entries: Vec<(Bytes, Value)>,
    // Key -> position in `entries`, so lookups stay O(1) on untrusted input.
    index: HashMap<Bytes, usize>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut Value> {
        let idx = *self.index.get(key)?;
        Some(&mut self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.index.contains_key(key)
    }

    /// Removes a key, keeping the remaining entries in order.
    pub fn remove(&mut self, key: &[u8]) -> Option<Value> {
        let idx = self.index.remove(key)?;
        let (_, value) = self.entries.remove(idx);
        for (k, _) in &self.entries[idx..] {
            if let Some(pos) = self.index.get_mut(k) {
                *pos -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Empties the dictionary, handing back its values.
    pub(crate) fn take_values(&mut self) -> Vec<Value> {
        self.index.clear();
        std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// Entries alone decide equality; the index is derived from them.
impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Dict {}

/// Borrowing iterator over dictionary entries in insertion order.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (Bytes, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Bytes, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Bytes, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Dict {
    type Item = (Bytes, Value);
    type IntoIter = std::vec::IntoIter<(Bytes, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<Bytes>> FromIterator<(K, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        dict.extend(iter);
        dict
    }
}

impl<K: Into<Bytes>> Extend<(K, Value)> for Dict {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
