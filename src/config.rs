use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;

use super::error::ConfigError;

/// Nesting limit applied when no explicit limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 5000;

static MAX_DEPTH: RwLock<DepthLimit> =
    parking_lot::const_rwlock(DepthLimit::Bounded(DEFAULT_MAX_DEPTH));

/// Maximum nesting of lists and dictionaries accepted by the decoder.
///
/// Parses from a decimal integer or `unbounded`/`none`. Surrounding
/// whitespace is not trimmed and is rejected as not an integer.
///
/// `Bounded(0)` still accepts a single top-level scalar but rejects every
/// container, including the outermost one.
///
/// ```
/// use rbencode::DepthLimit;
///
/// assert_eq!("12".parse::<DepthLimit>(), Ok(DepthLimit::Bounded(12)));
/// assert_eq!("unbounded".parse::<DepthLimit>(), Ok(DepthLimit::Unbounded));
/// assert!("-1".parse::<DepthLimit>().is_err());
/// assert!("1.5".parse::<DepthLimit>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    Bounded(usize),
    Unbounded,
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit::Bounded(DEFAULT_MAX_DEPTH)
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthLimit::Bounded(max) => write!(f, "{}", max),
            DepthLimit::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl From<usize> for DepthLimit {
    fn from(max: usize) -> Self {
        DepthLimit::Bounded(max)
    }
}

impl From<Option<usize>> for DepthLimit {
    fn from(max: Option<usize>) -> Self {
        max.map_or(DepthLimit::Unbounded, DepthLimit::Bounded)
    }
}

impl TryFrom<i64> for DepthLimit {
    type Error = ConfigError;

    fn try_from(max: i64) -> Result<Self, Self::Error> {
        usize::try_from(max)
            .map(DepthLimit::Bounded)
            .map_err(|_| ConfigError::Negative(max))
    }
}

impl FromStr for DepthLimit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unbounded") || s.eq_ignore_ascii_case("none") {
            return Ok(DepthLimit::Unbounded);
        }

        if let Some(digits) = s.strip_prefix('-') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                // "-0" names zero, not a negative limit.
                if digits.bytes().all(|b| b == b'0') {
                    return Ok(DepthLimit::Bounded(0));
                }
                let negative = s.parse::<i64>().unwrap_or(i64::MIN);
                return Err(ConfigError::Negative(negative));
            }
        }

        s.parse::<usize>()
            .map(DepthLimit::Bounded)
            .map_err(|_| ConfigError::NotAnInteger(s.to_string()))
    }
}

/// Returns the process-wide default depth limit.
pub fn max_depth() -> DepthLimit {
    *MAX_DEPTH.read()
}

/// Replaces the process-wide default depth limit.
///
/// The new limit applies to every decode that starts afterwards. A
/// [`Decoder`](crate::Decoder) snapshots the limit when it is built, so
/// decodes already in flight keep the limit they started with; callers that
/// need a fixed limit regardless of other threads should build a decoder with
/// [`Decoder::with_max_depth`](crate::Decoder::with_max_depth).
pub fn set_max_depth(limit: impl Into<DepthLimit>) {
    let limit = limit.into();
    let previous = std::mem::replace(&mut *MAX_DEPTH.write(), limit);
    tracing::debug!(%previous, current = %limit, "bencode max depth changed");
}

#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
