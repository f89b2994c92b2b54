//! Document-level metadata shared between block parsing, pre-processing and
//! the inline stage.

use std::{
    any::{Any, TypeId},
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::Serialize;

/// Type-keyed bag of values attached to the document.
///
/// Each type occupies at most one slot; extensions store their own types.
#[derive(Default)]
pub struct PropertyBag {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Returns the value of type `T`, inserting `T::default()` first if absent.
    pub fn get_or_default<T: Any + Default>(&mut self) -> &mut T {
        self.values
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("slot is keyed by its own TypeId")
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBag")
            .field("len", &self.values.len())
            .finish()
    }
}

/// A link reference definition such as `[foo]: /url "title"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceDefinition {
    /// The label as written, without brackets.
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
}

/// Reference definitions keyed by normalized label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceMap {
    definitions: BTreeMap<String, ReferenceDefinition>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a label: trims, collapses inner whitespace, folds case.
    pub fn normalize_label(label: &str) -> String {
        label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
            .to_uppercase()
    }

    /// Records a definition; the first definition of a label wins.
    /// Returns false if the label was already defined.
    pub fn insert(&mut self, definition: ReferenceDefinition) -> bool {
        let key = Self::normalize_label(&definition.label);
        if self.definitions.contains_key(&key) {
            return false;
        }
        self.definitions.insert(key, definition);
        true
    }

    pub fn get(&self, label: &str) -> Option<&ReferenceDefinition> {
        self.definitions.get(&Self::normalize_label(label))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ReferenceDefinition)> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
