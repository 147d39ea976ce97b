//! Common container types for StrangeYield

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An insertion-ordered, append-only list of named objects.
///
/// Lookup by name goes through a hash map built on insertion. Names are not
/// required to be unique: a duplicate is stored and reachable by index, but
/// [`NamedList::find`] keeps resolving to the first object with that name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<(String, T)>", into = "Vec<(String, T)>")]
pub struct NamedList<T: Clone> {
    items: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T: Clone> Default for NamedList<T> {
    fn default() -> Self {
        Self { items: Vec::new(), index: HashMap::new() }
    }
}

impl<T: Clone> NamedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object and return its index.
    pub fn push(&mut self, name: impl Into<String>, item: T) -> usize {
        let name = name.into();
        let idx = self.items.len();
        if self.index.contains_key(&name) {
            log::debug!("duplicate name '{name}' at index {idx}; lookups keep the first entry");
        } else {
            self.index.insert(name.clone(), idx);
        }
        self.items.push((name, item));
        idx
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list holds no objects.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Object at `idx`.
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx).map(|(_, t)| t)
    }

    /// Mutable object at `idx`.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx).map(|(_, t)| t)
    }

    /// Name of the object at `idx`.
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.items.get(idx).map(|(n, _)| n.as_str())
    }

    /// Index of the first object called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// First object called `name`.
    pub fn find(&self, name: &str) -> Option<&T> {
        self.position(name).and_then(|i| self.get(i))
    }

    /// Mutable access to the first object called `name`.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut T> {
        let idx = self.position(name)?;
        self.get_mut(idx)
    }

    /// Iterate over `(name, object)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Iterate mutably over objects in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().map(|(_, t)| t)
    }

    /// Iterate over objects in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, t)| t)
    }
}

impl<T: Clone> From<Vec<(String, T)>> for NamedList<T> {
    fn from(items: Vec<(String, T)>) -> Self {
        let mut list = NamedList::new();
        for (name, item) in items {
            list.push(name, item);
        }
        list
    }
}

impl<T: Clone> From<NamedList<T>> for Vec<(String, T)> {
    fn from(list: NamedList<T>) -> Self {
        list.items
    }
}
