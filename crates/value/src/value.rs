//! Reference-counted value tree nodes and their child sequences.
//!
//! A [`Value`] is a handle: cloning it yields another handle to the *same*
//! node, so writes through one handle are visible through every other. Use
//! [`Value::deep_copy`] to obtain an independent tree.
//!
//! Locks are always taken node-first, then sequence, and never held across a
//! recursive call.

use crate::scalar::Scalar;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Node {
    scalar: Scalar,
    children: IndexMap<String, ValueVector>,
}

/// A handle to one node of the value tree.
#[derive(Clone, Default)]
pub struct Value {
    node: Arc<RwLock<Node>>,
}

impl Value {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scalar(scalar: impl Into<Scalar>) -> Self {
        let value = Self::new();
        value.set_scalar(scalar);
        value
    }

    /// Identity of the underlying node, stable for the node's lifetime.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.node) as *const () as usize
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn scalar(&self) -> Scalar {
        self.node.read().scalar.clone()
    }

    pub fn set_scalar(&self, scalar: impl Into<Scalar>) {
        self.node.write().scalar = scalar.into();
    }

    pub fn is_defined(&self) -> bool {
        self.node.read().scalar.is_defined()
    }

    pub fn to_bool(&self) -> bool {
        self.node.read().scalar.to_bool()
    }

    // --- Non-vivifying reads ---

    /// The sequence stored under `name`, if the field exists. The sequence may
    /// be empty; callers treat an empty sequence like an absent one.
    pub fn child_vector(&self, name: &str) -> Option<ValueVector> {
        self.node.read().children.get(name).cloned()
    }

    /// The element at `index` of the sequence under `name`, without creating it.
    pub fn child(&self, name: &str, index: usize) -> Option<Value> {
        self.child_vector(name)?.get(index)
    }

    /// True if at least one field holds a non-empty sequence.
    pub fn has_children(&self) -> bool {
        self.node.read().children.values().any(|v| !v.is_empty())
    }

    /// All `(name, sequence)` pairs whose sequence is non-empty, in field order.
    pub fn field_entries(&self) -> Vec<(String, ValueVector)> {
        self.node
            .read()
            .children
            .iter()
            .filter(|(_, vector)| !vector.is_empty())
            .map(|(name, vector)| (name.clone(), vector.clone()))
            .collect()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.field_entries().into_iter().map(|(name, _)| name).collect()
    }

    // --- Vivifying writes ---

    /// The sequence under `name`, created empty if absent.
    pub fn get_children(&self, name: &str) -> ValueVector {
        if let Some(vector) = self.child_vector(name) {
            return vector;
        }
        self.node
            .write()
            .children
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// The first element under `name`, created if absent.
    pub fn first_child(&self, name: &str) -> Value {
        self.get_children(name).get_or_create(0)
    }

    /// Appends `value` (as a handle, not a copy) to the sequence under `name`.
    pub fn add_child(&self, name: &str, value: Value) {
        self.get_children(name).push(value);
    }

    /// Builds an independent copy of this subtree.
    ///
    /// Nodes reachable along several paths are copied once, so aliases inside
    /// the subtree (cycles included) are reproduced among the copies.
    pub fn deep_copy(&self) -> Value {
        self.copy_with(&mut HashMap::new())
    }

    /// Replaces the scalar and children of `dest` with a deep copy of `self`.
    pub fn deep_copy_into(&self, dest: &Value) {
        if self.ptr_eq(dest) {
            return;
        }
        let mut copies = HashMap::from([(self.id(), dest.clone())]);
        let node = self.copy_node(&mut copies);
        *dest.node.write() = node;
    }

    fn copy_with(&self, copies: &mut HashMap<usize, Value>) -> Value {
        if let Some(copy) = copies.get(&self.id()) {
            return copy.clone();
        }
        let copy = Value::new();
        copies.insert(self.id(), copy.clone());
        let node = self.copy_node(copies);
        *copy.node.write() = node;
        copy
    }

    fn copy_node(&self, copies: &mut HashMap<usize, Value>) -> Node {
        let (scalar, entries) = {
            let node = self.node.read();
            let entries: Vec<(String, ValueVector)> = node
                .children
                .iter()
                .map(|(name, vector)| (name.clone(), vector.clone()))
                .collect();
            (node.scalar.clone(), entries)
        };

        let mut children = IndexMap::with_capacity(entries.len());
        for (name, vector) in entries {
            let values: Vec<Value> = vector
                .snapshot()
                .iter()
                .map(|value| value.copy_with(copies))
                .collect();
            if !values.is_empty() {
                children.insert(name, ValueVector::from_values(values));
            }
        }
        Node { scalar, children }
    }

    /// Structural equality of two subtrees (scalars by kind and content, fields
    /// by name and order-insensitive). A pair of nodes met again while still
    /// being compared counts as equal.
    pub fn deep_eq(&self, other: &Value) -> bool {
        self.eq_with(other, &mut HashSet::new())
    }

    fn eq_with(&self, other: &Value, visiting: &mut HashSet<(usize, usize)>) -> bool {
        if self.ptr_eq(other) || !visiting.insert((self.id(), other.id())) {
            return true;
        }
        if self.scalar() != other.scalar() {
            return false;
        }
        let mine = self.field_entries();
        let theirs = other.field_entries();
        if mine.len() != theirs.len() {
            return false;
        }
        mine.iter().all(|(name, vector)| {
            other.child_vector(name).is_some_and(|other_vector| {
                let (a, b) = (vector.snapshot(), other_vector.snapshot());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_with(y, visiting))
            })
        })
    }
}

/// Shows the scalar and the size of each field; children are not expanded.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Value");
        debug.field("scalar", &self.scalar());
        for (name, vector) in self.field_entries() {
            debug.field(&name, &vector.len());
        }
        debug.finish()
    }
}

/// An ordered, growable sequence of sibling nodes sharing one field name.
#[derive(Clone, Default)]
pub struct ValueVector {
    values: Arc<RwLock<Vec<Value>>>,
}

impl ValueVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.read().get(index).cloned()
    }

    /// The element at `index`, padding the sequence with undefined values
    /// if it is too short.
    pub fn get_or_create(&self, index: usize) -> Value {
        if let Some(value) = self.get(index) {
            return value;
        }
        let mut values = self.values.write();
        while values.len() <= index {
            values.push(Value::new());
        }
        values[index].clone()
    }

    /// Stores `value` at `index`, padding with undefined values as needed.
    pub fn set(&self, index: usize, value: Value) {
        let mut values = self.values.write();
        while values.len() < index {
            values.push(Value::new());
        }
        if index < values.len() {
            values[index] = value;
        } else {
            values.push(value);
        }
    }

    pub fn push(&self, value: Value) {
        self.values.write().push(value);
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut values = self.values.write();
        (index < values.len()).then(|| values.remove(index))
    }

    /// A consistent copy of the element handles, taken under a single read lock.
    pub fn snapshot(&self) -> Vec<Value> {
        self.values.read().clone()
    }

}

impl fmt::Debug for ValueVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_never_vivify() {
        let root = Value::new();
        assert!(root.child_vector("missing").is_none());
        assert!(root.child("missing", 3).is_none());
        assert!(!root.has_children());
        assert!(root.field_names().is_empty());
    }

    #[test]
    fn test_field_entries_skip_empty_sequences() {
        let root = Value::new();
        root.add_child("a", Value::with_scalar(1));
        let _ = root.get_children("empty");
        root.add_child("b", Value::with_scalar(2));

        assert_eq!(root.field_names(), vec!["a".to_string(), "b".to_string()]);
        assert!(root.child_vector("empty").is_some_and(|v| v.is_empty()));
    }

    #[test]
    fn test_clone_is_alias_and_deep_copy_is_independent() {
        let root = Value::new();
        root.first_child("x").set_scalar(1);

        let alias = root.clone();
        alias.first_child("x").set_scalar(2);
        assert_eq!(root.first_child("x").scalar(), Scalar::Int(2));

        let copy = root.deep_copy();
        copy.first_child("x").set_scalar(3);
        assert_eq!(root.first_child("x").scalar(), Scalar::Int(2));
        assert!(!copy.deep_eq(&root));
    }

    #[test]
    fn test_vector_padding() {
        let vector = ValueVector::new();
        vector.get_or_create(2).set_scalar("c");
        assert_eq!(vector.len(), 3);
        assert!(!vector.get(0).is_some_and(|v| v.is_defined()));

        vector.set(5, Value::with_scalar(5));
        assert_eq!(vector.len(), 6);
        assert_eq!(vector.remove(9).map(|v| v.scalar()), None);
    }

    #[test]
    fn test_deep_copy_into_replaces_target() {
        let source = Value::with_scalar("src");
        source.add_child("k", Value::with_scalar(1));
        let target = Value::with_scalar("old");
        target.add_child("old", Value::new());

        source.deep_copy_into(&target);
        assert!(target.deep_eq(&source));
        assert!(!target.ptr_eq(&source));
        assert!(target.child_vector("old").is_none());
    }

    #[test]
    fn test_deep_copy_reproduces_cycles() {
        let root = Value::new();
        let node = root.first_child("loop");
        node.set_scalar(7);
        node.add_child("self", node.clone());
        node.add_child("twin", node.first_child("self"));

        let copy = node.deep_copy();
        assert!(!copy.ptr_eq(&node));
        assert!(copy.first_child("self").ptr_eq(&copy));
        assert!(copy.first_child("twin").ptr_eq(&copy));
        assert!(copy.deep_eq(&node));

        copy.set_scalar(8);
        assert_eq!(node.scalar(), Scalar::Int(7));
        assert!(!copy.deep_eq(&node));
        assert!(format!("{:?}", copy).contains("self"));
    }

    #[test]
    fn test_deep_copy_into_redirects_cycles_to_target() {
        let source = Value::with_scalar("src");
        source.add_child("back", source.clone());
        let target = Value::new();

        source.deep_copy_into(&target);
        assert!(target.first_child("back").ptr_eq(&target));
        assert!(target.deep_eq(&source));
    }
}
