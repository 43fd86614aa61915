use std::fs::File;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;

use super::config::{self, DepthLimit};
use super::dict::Dict;
use super::error::{DecodeError, Structure};
use super::value::Value;

/// Decodes a complete bencode value using the process-wide depth limit.
///
/// Returns `Ok(None)` for empty input. Otherwise the input must hold exactly
/// one value; bytes after it are rejected as trailing garbage.
///
/// # Examples
///
/// ```
/// use rbencode::{decode, Value};
///
/// let value = decode(b"li1ei2ee").unwrap().unwrap();
/// assert_eq!(value, Value::List(vec![Value::Integer(1), Value::Integer(2)]));
///
/// assert_eq!(decode(b"").unwrap(), None);
///
/// let err = decode(b"i1ei2e").unwrap_err();
/// assert_eq!(err.offset(), Some(3));
/// ```
pub fn decode(data: &[u8]) -> Result<Option<Value>, DecodeError> {
    Decoder::new().decode(data)
}

/// Decodes an owned buffer; byte strings in the result share its storage.
pub fn decode_bytes(data: Bytes) -> Result<Option<Value>, DecodeError> {
    Decoder::new().decode_bytes(data)
}

/// Reads `reader` to the end and decodes its content.
pub fn decode_from<R: Read>(reader: R) -> Result<Option<Value>, DecodeError> {
    Decoder::new().decode_from(reader)
}

/// Reads the file at `path` and decodes its content.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Option<Value>, DecodeError> {
    Decoder::new().decode_file(path)
}

/// A decoder with a fixed nesting limit.
///
/// [`Decoder::new`] takes a snapshot of the process-wide limit, so later calls
/// to [`set_max_depth`](crate::set_max_depth) do not affect it.
///
/// ```
/// use rbencode::Decoder;
///
/// let decoder = Decoder::with_max_depth(1usize);
/// assert!(decoder.decode(b"li1ee").is_ok());
/// assert!(decoder.decode(b"lli1eee").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_depth: DepthLimit,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            max_depth: config::max_depth(),
        }
    }

    pub fn with_max_depth(max_depth: impl Into<DepthLimit>) -> Self {
        Self {
            max_depth: max_depth.into(),
        }
    }

    pub fn max_depth(&self) -> DepthLimit {
        self.max_depth
    }

    pub fn decode(&self, data: &[u8]) -> Result<Option<Value>, DecodeError> {
        Parser::new(data, None, self.max_depth).parse()
    }

    pub fn decode_bytes(&self, data: Bytes) -> Result<Option<Value>, DecodeError> {
        Parser::new(&data, Some(&data), self.max_depth).parse()
    }

    pub fn decode_from<R: Read>(&self, mut reader: R) -> Result<Option<Value>, DecodeError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.decode_bytes(Bytes::from(buf))
    }

    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Option<Value>, DecodeError> {
        let path = path.as_ref();
        tracing::trace!(
            path = %path.display(),
            max_depth = %self.max_depth,
            "decoding bencode file"
        );

        let file = File::open(path)?;
        self.decode_from(file).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "bencode file rejected");
            e
        })
    }
}

/// An open container waiting for its items.
enum Frame {
    List {
        start: usize,
        items: Vec<Value>,
    },
    Dict {
        start: usize,
        dict: Dict,
        key: Option<Bytes>,
    },
}

impl Frame {
    fn structure(&self) -> Structure {
        match self {
            Frame::List { .. } => Structure::List,
            Frame::Dict { .. } => Structure::Dictionary,
        }
    }

    /// Closes the container, returning it with the offset of its opening byte.
    fn close(self) -> (usize, Value) {
        match self {
            Frame::List { start, items } => (start, Value::List(items)),
            Frame::Dict { start, dict, .. } => (start, Value::Dict(dict)),
        }
    }
}

/// Single-pass parser over a borrowed buffer.
///
/// Containers live on an explicit stack instead of the native one, and
/// [`Value`] drops iteratively, so the nesting limit is a policy choice and
/// never a stack-safety requirement.
struct Parser<'a> {
    data: &'a [u8],
    owner: Option<&'a Bytes>,
    pos: usize,
    max_depth: DepthLimit,
}

impl<'a> Parser<'a> {
    fn new(data: &'a [u8], owner: Option<&'a Bytes>, max_depth: DepthLimit) -> Self {
        Self {
            data,
            owner,
            pos: 0,
            max_depth,
        }
    }

    fn parse(mut self) -> Result<Option<Value>, DecodeError> {
        let Some(first) = self.peek() else {
            return Ok(None);
        };

        let mut stack: Vec<Frame> = Vec::new();
        let mut lookahead = first;

        loop {
            let (start, mut value) = match stack.pop() {
                Some(frame) if lookahead == b'e' => {
                    if let Frame::Dict { key: Some(_), .. } = frame {
                        return Err(DecodeError::Malformed {
                            structure: Structure::Dictionary,
                            offset: self.pos,
                            found: 'e',
                        });
                    }
                    self.pos += 1;
                    frame.close()
                }
                frame => {
                    let start = self.pos;
                    stack.extend(frame);
                    match self.item(lookahead, &mut stack)? {
                        Some(value) => (start, value),
                        None => match self.peek() {
                            Some(next) => {
                                lookahead = next;
                                continue;
                            }
                            None => return Err(self.unclosed(&stack)),
                        },
                    }
                }
            };

            match stack.last_mut() {
                None => {
                    if self.pos != self.data.len() {
                        return Err(DecodeError::TrailingGarbage { offset: self.pos });
                    }
                    return Ok(Some(value));
                }
                Some(Frame::List { items, .. }) => items.push(value),
                Some(Frame::Dict { dict, key, .. }) => match key.take() {
                    Some(k) => {
                        dict.insert(k, value);
                    }
                    None => match &mut value {
                        Value::Bytes(k) => *key = Some(std::mem::take(k)),
                        _ => return Err(DecodeError::KeyNotString { offset: start }),
                    },
                },
            }

            match self.peek() {
                Some(next) => lookahead = next,
                None => return Err(self.unclosed(&stack)),
            }
        }
    }

    /// Reads the element starting with `lookahead` at the cursor.
    ///
    /// Scalars are returned whole. A container is pushed onto `stack` and
    /// `None` is returned; its items are read by later calls.
    fn item(
        &mut self,
        lookahead: u8,
        stack: &mut Vec<Frame>,
    ) -> Result<Option<Value>, DecodeError> {
        let start = self.pos;
        match lookahead {
            b'i' => self.integer().map(|i| Some(Value::Integer(i))),
            b'0'..=b'9' => self.byte_string().map(|b| Some(Value::Bytes(b))),
            b'l' => {
                self.open(stack.len() + 1)?;
                stack.push(Frame::List {
                    start,
                    items: Vec::new(),
                });
                Ok(None)
            }
            b'd' => {
                self.open(stack.len() + 1)?;
                stack.push(Frame::Dict {
                    start,
                    dict: Dict::new(),
                    key: None,
                });
                Ok(None)
            }
            c => Err(DecodeError::UnknownElement {
                offset: self.pos,
                found: c as char,
            }),
        }
    }

    /// End of input inside the innermost open container.
    fn unclosed(&self, stack: &[Frame]) -> DecodeError {
        let structure = stack
            .last()
            .map_or(Structure::List, |frame| frame.structure());
        self.unexpected_end(structure)
    }

    fn open(&mut self, depth: usize) -> Result<(), DecodeError> {
        if let DepthLimit::Bounded(max_depth) = self.max_depth {
            if depth > max_depth {
                return Err(DecodeError::TooDeep {
                    offset: self.pos,
                    max_depth,
                });
            }
        }
        self.pos += 1;
        Ok(())
    }

    fn integer(&mut self) -> Result<i64, DecodeError> {
        self.pos += 1;

        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }

        // Accumulate towards the sign so that i64::MIN is representable.
        let mut value: i64 = 0;
        let mut digits = 0usize;
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end(Structure::Integer)),
                Some(b @ b'0'..=b'9') => {
                    let digit = i64::from(b - b'0');
                    value = value
                        .checked_mul(10)
                        .and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        })
                        .ok_or(DecodeError::IntegerOverflow { offset: self.pos })?;
                    digits += 1;
                    self.pos += 1;
                }
                Some(b'e') if digits > 0 => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some(c) => {
                    return Err(DecodeError::Malformed {
                        structure: Structure::Integer,
                        offset: self.pos,
                        found: c as char,
                    })
                }
            }
        }
    }

    fn byte_string(&mut self) -> Result<Bytes, DecodeError> {
        let mut len: usize = 0;
        while let Some(b @ b'0'..=b'9') = self.peek() {
            len = len
                .checked_mul(10)
                .and_then(|l| l.checked_add(usize::from(b - b'0')))
                .ok_or(DecodeError::InvalidStringLength {
                    offset: self.pos,
                    found: b as char,
                })?;
            self.pos += 1;
        }

        match self.peek() {
            None => return Err(self.unexpected_end(Structure::String)),
            Some(b':') => self.pos += 1,
            Some(c) => {
                return Err(DecodeError::InvalidStringLength {
                    offset: self.pos,
                    found: c as char,
                })
            }
        }

        if self.data.len() - self.pos < len {
            return Err(DecodeError::UnexpectedEnd {
                structure: Structure::String,
                offset: self.data.len(),
            });
        }

        let start = self.pos;
        self.pos += len;
        Ok(match self.owner {
            Some(owner) => owner.slice(start..self.pos),
            None => Bytes::copy_from_slice(&self.data[start..self.pos]),
        })
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn unexpected_end(&self, structure: Structure) -> DecodeError {
        DecodeError::UnexpectedEnd {
            structure,
            offset: self.pos,
        }
    }
}
