/*!
This module contains the key paths used to select the fields that records are ordered by.

A key path is written as a dotted string e.g. `name` or `pay.startSalary`. Each segment names a
field to read from the value produced by the previous segment, starting with the record itself.

# Grammar

```text
key     = segment ( "." segment )*
segment = any character except "." , repeated one or more times
```

Segments are only checked for being non-empty when a key is parsed. Whether a segment actually
names a field is not known until a record is resolved because the comparator does not know the
record type up front.
*/

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::config::KEY_SEGMENT_SEPARATOR;
use crate::errors::{ComparatorError, ComparatorResult};

/// An ordered, non-empty sequence of field names leading from a record to a value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyPath {
    /// The field names to read in order. There is always at least one and none are empty.
    segments: Vec<String>,
}

/// Public methods
impl KeyPath {
    /**
    Parse a dotted key string into a [`KeyPath`].

    Returns [`ComparatorError::MalformedKey`] if the key is empty or if any segment is empty i.e.
    the key starts or ends with a separator or has two separators in a row.
    */
    pub fn parse(key: &str) -> ComparatorResult<KeyPath> {
        let segments: Vec<String> = key
            .split(KEY_SEGMENT_SEPARATOR)
            .map(str::to_owned)
            .collect();

        // Splitting an empty string yields a single empty segment so this also rejects `""`
        if segments.iter().any(String::is_empty) {
            return Err(ComparatorError::MalformedKey {
                key: key.to_owned(),
            });
        }

        Ok(KeyPath { segments })
    }

    /// Get the field names making up this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The number of fields that are read to resolve this path.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl FromStr for KeyPath {
    type Err = ComparatorError;

    fn from_str(key: &str) -> ComparatorResult<KeyPath> {
        KeyPath::parse(key)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = ComparatorError;

    fn try_from(key: &str) -> ComparatorResult<KeyPath> {
        KeyPath::parse(key)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = KEY_SEGMENT_SEPARATOR.to_string();
        write!(f, "{}", self.segments.join(separator.as_str()))
    }
}

/**
Parse each of the provided key strings into a key list, preserving their order.

Fails on the first malformed key.
*/
pub(crate) fn parse_key_list<I, S>(keys: I) -> ComparatorResult<Vec<KeyPath>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .map(|key| KeyPath::parse(key.as_ref()))
        .collect()
}
