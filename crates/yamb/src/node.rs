//! Generic document tree.
//!
//! A [`Node`] is the raw, codec-level shape of a document: scalars, sequences
//! and mappings. Sequences and mappings are shared handles. Cloning a
//! [`Mapping`] or [`Sequence`] produces another handle to the *same* storage,
//! so a mutation made through one handle is visible through every other one.
//! Use [`Node::deep_copy`] when an independent tree is wanted.
//!
//! ```
//! use yamb::node::{Mapping, Node};
//!
//! let inner = Mapping::new();
//! let outer = Mapping::new();
//! outer.insert("inner", Node::Map(inner.clone()));
//!
//! inner.insert("value", 2);
//! let seen = outer.get("inner").unwrap();
//! assert_eq!(seen.as_mapping().unwrap().get("value"), Some(Node::Int(2)));
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};

/// A raw document value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Node {
    /// Null (also used for "absent").
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Shared sequence handle.
    Seq(Sequence),
    /// Shared mapping handle.
    Map(Mapping),
}

impl Node {
    /// Short name of this node's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::Str(_) => "string",
            Node::Seq(_) => "sequence",
            Node::Map(_) => "mapping",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get a float, widening integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Float(f) => Some(*f),
            Node::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Copy this tree so that no sequence or mapping is shared with `self`.
    #[must_use]
    pub fn deep_copy(&self) -> Node {
        match self {
            Node::Seq(seq) => Node::Seq(seq.deep_copy()),
            Node::Map(map) => Node::Map(map.deep_copy()),
            scalar => scalar.clone(),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    f32 => Float,
    String => Str,
    &str => Str,
);

impl From<Sequence> for Node {
    fn from(seq: Sequence) -> Self {
        Node::Seq(seq)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Map(map)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Seq(Sequence::from(items))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}

impl PartialEq<i64> for Node {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Node {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<f64> for Node {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Node::Float(f) if f == other)
    }
}

impl PartialEq<bool> for Node {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// A shared, mutable list of nodes.
#[derive(Clone, Default)]
pub struct Sequence(Rc<RefCell<Vec<Node>>>);

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Get the element at `index` (containers are returned as aliases).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Node> {
        self.0.borrow().get(index).cloned()
    }

    /// Replace the element at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index >= len()`.
    pub fn set(&self, index: usize, node: Node) -> Result<Node> {
        let mut items = self.0.borrow_mut();
        let length = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, length })?;
        Ok(std::mem::replace(slot, node))
    }

    /// Insert `node` at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index > len()`.
    pub fn insert(&self, index: usize, node: Node) -> Result<()> {
        let mut items = self.0.borrow_mut();
        if index > items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                length: items.len(),
            });
        }
        items.insert(index, node);
        Ok(())
    }

    /// Remove and return the element at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index >= len()`.
    pub fn remove(&self, index: usize) -> Result<Node> {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                length: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    pub fn push(&self, node: Node) {
        self.0.borrow_mut().push(node);
    }

    /// Snapshot of the current elements (containers stay aliased).
    #[must_use]
    pub fn to_vec(&self) -> Vec<Node> {
        self.0.borrow().clone()
    }

    /// Check whether two handles point at the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn deep_copy(&self) -> Sequence {
        self.0.borrow().iter().map(Node::deep_copy).collect()
    }
}

impl From<Vec<Node>> for Sequence {
    fn from(items: Vec<Node>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

/// A shared, mutable string-keyed map of nodes, kept in key order.
#[derive(Clone, Default)]
pub struct Mapping(Rc<RefCell<BTreeMap<String, Node>>>);

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Get the value under `key` (containers are returned as aliases).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Node> {
        self.0.borrow().get(key).cloned()
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.0.borrow_mut().insert(key.into(), node.into())
    }

    pub fn remove(&self, key: &str) -> Option<Node> {
        self.0.borrow_mut().remove(key)
    }

    /// Keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Snapshot of the current entries in key order (containers stay aliased).
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Node)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Check whether two handles point at the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn deep_copy(&self) -> Mapping {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_copy()))
            .collect()
    }
}

impl From<BTreeMap<String, Node>> for Mapping {
    fn from(entries: BTreeMap<String, Node>) -> Self {
        Self(Rc::new(RefCell::new(entries)))
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self::from(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_clone_aliases() {
        let a = Mapping::new();
        let b = a.clone();
        b.insert("x", 1);
        assert_eq!(a.get("x"), Some(Node::Int(1)));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_deep_copy_detaches() {
        let inner = Sequence::from(vec![Node::from(1)]);
        let outer = Mapping::new();
        outer.insert("items", inner.clone());

        let copy = Node::Map(outer.clone()).deep_copy();
        inner.push(Node::from(2));

        let copied = copy.as_mapping().unwrap().get("items").unwrap();
        assert_eq!(copied.as_sequence().unwrap().len(), 1);
        assert_eq!(outer.get("items").unwrap().as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_sequence_bounds() {
        let seq = Sequence::from(vec![Node::from("a")]);
        assert_eq!(
            seq.set(1, Node::Null),
            Err(Error::IndexOutOfBounds {
                index: 1,
                length: 1
            })
        );
        assert_eq!(
            seq.remove(5),
            Err(Error::IndexOutOfBounds {
                index: 5,
                length: 1
            })
        );
        // inserting at len() appends
        seq.insert(1, Node::from("b")).unwrap();
        assert_eq!(seq.to_vec(), vec![Node::from("a"), Node::from("b")]);
        assert!(seq.insert(3, Node::Null).is_err());
    }

    #[test]
    fn test_structural_equality() {
        let a: Mapping = [("k", Node::from(vec![Node::from(1.5)]))]
            .into_iter()
            .collect();
        let b: Mapping = [("k", Node::from(vec![Node::from(1.5)]))]
            .into_iter()
            .collect();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(Node::from(1), Node::from(1.0));
    }

    #[test]
    fn test_scalar_comparisons() {
        assert_eq!(Node::from("x"), "x");
        assert_eq!(Node::from(3), 3);
        assert_eq!(Node::from(true), true);
        assert_eq!(Node::from(None::<i64>), Node::Null);
        assert_eq!(Node::from(2).as_f64(), Some(2.0));
    }
}
