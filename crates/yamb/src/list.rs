//! Live sequence views for collection fields.

use std::fmt;
use std::ops::AddAssign;

use tracing::trace;

use crate::descriptor::{SchemaRef, dump_element, load_element};
use crate::error::{Error, Result};
use crate::node::Sequence;
use crate::object::Object;

/// A live view over a raw sequence of fragments.
///
/// Every operation reads or writes the backing [`Sequence`] at the moment of
/// the call; nothing is cached. Elements are converted to [`Object`]s on read
/// and dumped back to fragments on write, so two proxies over the same field
/// see each other's changes.
#[derive(Clone)]
pub struct ListProxy {
    list: Sequence,
    element: SchemaRef,
}

impl ListProxy {
    #[must_use]
    pub fn new(list: Sequence, element: impl Into<SchemaRef>) -> Self {
        Self {
            list,
            element: element.into(),
        }
    }

    /// The backing raw sequence.
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        &self.list
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// A fresh facade over the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index >= len()`, or
    /// `Error::UnexpectedType` if the element is not a mapping.
    pub fn get(&self, index: usize) -> Result<Object> {
        let raw = self.list.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            length: self.list.len(),
        })?;
        load_element(&self.element, raw)
    }

    /// Replace the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index >= len()`.
    pub fn set(&self, index: usize, object: &Object) -> Result<()> {
        self.list.set(index, dump_element(object))?;
        trace!(index, "set list element");
        Ok(())
    }

    /// Delete the element at `index`, shifting later elements down.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index >= len()`.
    pub fn remove(&self, index: usize) -> Result<()> {
        self.list.remove(index)?;
        trace!(index, "removed list element");
        Ok(())
    }

    /// Insert before `index`; `index == len()` appends.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index > len()`.
    pub fn insert(&self, index: usize, object: &Object) -> Result<()> {
        self.list.insert(index, dump_element(object))?;
        trace!(index, "inserted list element");
        Ok(())
    }

    /// Append at the end, same as `insert(len(), object)`.
    pub fn push(&self, object: &Object) {
        self.list.push(dump_element(object));
        trace!(index = self.list.len() - 1, "appended list element");
    }

    /// Append each object in order.
    pub fn extend<I: IntoIterator<Item = Object>>(&self, objects: I) {
        for object in objects {
            self.push(&object);
        }
    }

    /// Iterate over the elements as facades.
    ///
    /// The length is re-read at every step, so the iterator follows changes
    /// made while it is alive.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            proxy: self,
            index: 0,
        }
    }
}

impl AddAssign<Vec<Object>> for ListProxy {
    fn add_assign(&mut self, objects: Vec<Object>) {
        self.extend(objects);
    }
}

impl PartialEq for ListProxy {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl fmt::Debug for ListProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListProxy")
            .field("element", &self.element)
            .field("list", &self.list)
            .finish()
    }
}

/// Iterator over a [`ListProxy`].
#[derive(Debug)]
pub struct Iter<'a> {
    proxy: &'a ListProxy,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = Result<Object>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.proxy.len() {
            return None;
        }
        let item = self.proxy.get(self.index);
        self.index += 1;
        Some(item)
    }
}

impl<'a> IntoIterator for &'a ListProxy {
    type Item = Result<Object>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::node::{Mapping, Node};
    use crate::schema::Schema;
    use crate::value::Value;

    fn thing() -> Rc<Schema> {
        Schema::builder("Thing").literal("value").build()
    }

    fn make(value: &str) -> Object {
        Object::with_fields(thing(), [("value", Value::from(value))]).unwrap()
    }

    fn values(proxy: &ListProxy) -> Vec<Node> {
        proxy
            .iter()
            .map(|item| item.unwrap().get("value").unwrap().into_node())
            .collect()
    }

    #[test]
    fn test_get_wraps_by_reference() {
        let fragment = Mapping::new();
        fragment.insert("value", 1);
        let list = Sequence::from(vec![Node::Map(fragment.clone())]);
        let proxy = ListProxy::new(list, thing());

        let item = proxy.get(0).unwrap();
        assert!(item.fragment().ptr_eq(&fragment));
        item.set("value", 2).unwrap();
        assert_eq!(fragment.get("value"), Some(Node::Int(2)));
    }

    #[test]
    fn test_mutations_reach_backing_list() {
        let list = Sequence::new();
        let proxy = ListProxy::new(list.clone(), thing());

        proxy.push(&make("b"));
        proxy.insert(0, &make("a")).unwrap();
        proxy.insert(2, &make("d")).unwrap();
        proxy.set(2, &make("c")).unwrap();
        assert_eq!(values(&proxy), vec![Node::from("a"), Node::from("b"), Node::from("c")]);

        proxy.remove(1).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(values(&proxy), vec![Node::from("a"), Node::from("c")]);
    }

    #[test]
    fn test_add_assign_appends_in_order() {
        let mut proxy = ListProxy::new(Sequence::new(), thing());
        proxy += vec![make("1"), make("2")];
        assert_eq!(values(&proxy), vec![Node::from("1"), Node::from("2")]);
    }

    #[test]
    fn test_two_proxies_share_state() {
        let list = Sequence::new();
        let first = ListProxy::new(list.clone(), thing());
        let second = ListProxy::new(list, thing());

        first.push(&make("x"));
        assert_eq!(second.len(), 1);
        second.remove(0).unwrap();
        assert!(first.is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let proxy = ListProxy::new(Sequence::new(), thing());
        assert_eq!(
            proxy.get(0).unwrap_err(),
            Error::IndexOutOfBounds {
                index: 0,
                length: 0
            }
        );
        assert!(proxy.set(0, &make("x")).is_err());
        assert!(proxy.remove(0).is_err());
        assert!(proxy.insert(1, &make("x")).is_err());
    }

    #[test]
    fn test_non_mapping_element() {
        let proxy = ListProxy::new(Sequence::from(vec![Node::from(1)]), thing());
        assert_eq!(
            proxy.get(0).unwrap_err(),
            Error::UnexpectedType {
                expected: "mapping",
                found: "int"
            }
        );
    }
}
