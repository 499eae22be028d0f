//! Wide text.
use std::fmt;

/// Wide text, a sequence of UTF-16 code units.
///
/// Postgres has no wide string type; a [`WText`] travels as `text`, converted
/// to UTF-8 when encoded and back when decoded. A failed conversion in either
/// direction logs a warning and yields an empty value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WText(Vec<u16>);

impl WText {
    /// An empty wide string.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// The UTF-16 code units.
    pub fn as_units(&self) -> &[u16] {
        &self.0
    }

    /// Number of code units.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no code units.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for WText {
    fn from(text: &str) -> Self {
        Self(text.encode_utf16().collect())
    }
}

impl From<Vec<u16>> for WText {
    fn from(units: Vec<u16>) -> Self {
        Self(units)
    }
}

impl fmt::Display for WText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.0))
    }
}

impl fmt::Debug for WText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf16_lossy(&self.0))
    }
}
