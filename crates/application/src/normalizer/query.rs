//! Flat query string decoding
//!
//! Dotted keys such as `traits.name=x` become nested records; repeated keys
//! become lists.

use std::collections::HashMap;

use domain::{Body, BodyValue};

use super::path::split_path;

/// Multi-valued query parameters, keys kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string
    ///
    /// `+` decodes to a space and percent escapes are resolved.
    pub fn parse(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Add a value under `key`, after any values already present
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if let Some(&position) = self.index.get(&key) {
            self.entries[position].1.push(value.into());
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, vec![value.into()]));
        }
    }

    /// First value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value recorded for `key`
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Keys with their values, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.append(key, value);
        }
        values
    }
}

/// Build a nested record from query parameters
///
/// Keys with a blank path segment are dropped. A single value is stored as a
/// string, several as a list. Plain keys are stored verbatim; dotted keys
/// create (or reuse) one nested record per leading segment. When a leading
/// segment already holds a non-record value, that value is replaced by a
/// record; sibling keys are never touched.
pub fn decode_query(values: &QueryValues) -> Body {
    let mut body = Body::new();

    for (key, raw) in values.iter() {
        let parts = split_path(key);
        if parts.is_empty() {
            continue;
        }

        let value = match raw {
            [single] => BodyValue::String(single.clone()),
            many => BodyValue::List(many.to_vec()),
        };

        if parts.len() == 1 {
            body.insert(key.to_string(), value);
        } else {
            insert_at(&mut body, &parts, value);
        }
    }

    body
}

fn insert_at(ctx: &mut Body, path: &[&str], value: BodyValue) {
    match path {
        [] => {},
        [last] => {
            ctx.insert((*last).to_string(), value);
        },
        [head, rest @ ..] => {
            let slot = ctx
                .entry((*head).to_string())
                .or_insert_with(|| BodyValue::Record(Body::new()));
            if !matches!(slot, BodyValue::Record(_)) {
                *slot = BodyValue::Record(Body::new());
            }
            if let BodyValue::Record(child) = slot {
                insert_at(child, rest, value);
            }
        },
    }
}
