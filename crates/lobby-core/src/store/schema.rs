//! Shape validators for decoded slot content.
//!
//! Every cache runs decoded JSON through one of these before trusting it.
//! Validators never fail loudly: content that does not fit comes back as
//! [`Validated::Invalid`] and the caller decides whether to repair.

use serde_json::Value;

use crate::models::PubMap;

/// Outcome of validating one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<T> {
    Valid(T),
    /// The slot has never been written
    Absent,
    /// The slot holds something that is not JSON, or JSON of the wrong shape
    Invalid,
}

impl<T> Validated<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn valid(self) -> Option<T> {
        match self {
            Validated::Valid(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Validated::Valid(value) => Validated::Valid(f(value)),
            Validated::Absent => Validated::Absent,
            Validated::Invalid => Validated::Invalid,
        }
    }
}

/// Accepts only a JSON array whose every element is a string.
pub fn string_list(value: &Value) -> Validated<Vec<String>> {
    let Some(items) = value.as_array() else {
        return Validated::Invalid;
    };

    let mut list = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) => list.push(s.to_string()),
            None => return Validated::Invalid,
        }
    }
    Validated::Valid(list)
}

/// Shallow check: the value must be a JSON object.
///
/// Entries are not validated deeply. A non-array value becomes an empty pub
/// list and non-string array elements are skipped, so one bad entry never
/// costs the user every other workspace's pubs.
pub fn pub_map(value: &Value) -> Validated<PubMap> {
    let Some(object) = value.as_object() else {
        return Validated::Invalid;
    };

    let map = object
        .iter()
        .map(|(workspace, urls)| {
            let urls = urls
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            (workspace.clone(), urls)
        })
        .collect();
    Validated::Valid(map)
}
