use indexmap::IndexMap;
use serde::Serialize;

/// A value submitted under one name, or several under a `name[]` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry<T> {
    /// `name`
    Single(T),
    /// `name[]`
    Multiple(Vec<T>),
}

impl<T> Entry<T> {
    /// Gets the single value.
    #[must_use]
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Self::Single(v) => Some(v),
            Self::Multiple(_) => None,
        }
    }

    /// Gets the values of a `name[]` submission.
    #[must_use]
    pub fn as_multiple(&self) -> Option<&[T]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(v) => Some(v),
        }
    }

    /// Iterates over all values.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::Single(v) => std::slice::from_ref(v).iter(),
            Self::Multiple(v) => v.iter(),
        }
    }
}

pub(crate) fn insert<T>(map: &mut IndexMap<String, Entry<T>>, name: String, value: T) {
    map.insert(name, Entry::Single(value));
}

/// Appends to the list at `name`, a single value there is replaced.
pub(crate) fn append<T>(map: &mut IndexMap<String, Entry<T>>, name: String, value: T) {
    match map.get_mut(&name) {
        Some(Entry::Multiple(values)) => values.push(value),
        Some(entry) => *entry = Entry::Multiple(vec![value]),
        None => {
            map.insert(name, Entry::Multiple(vec![value]));
        }
    }
}
