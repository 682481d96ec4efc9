//! Facade-level field values.

use crate::list::ListProxy;
use crate::node::{Mapping, Node, Sequence};
use crate::object::Object;

/// The facade value of a field, as returned by [`Object::get`] and accepted
/// by [`Object::set`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A raw value (scalars, free-form lists and maps, or null).
    Literal(Node),
    /// A nested facade.
    Object(Object),
    /// A live view over a collection field.
    List(ListProxy),
    /// A whole list of facades, used to replace a collection field.
    Objects(Vec<Object>),
}

impl Value {
    /// Short name of this value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Literal(node) => node.kind(),
            Value::Object(_) => "object",
            Value::List(_) => "list",
            Value::Objects(_) => "list of objects",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Literal(Node::Null))
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<&Node> {
        match self {
            Value::Literal(node) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&ListProxy> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Lower this value to raw data.
    ///
    /// Objects become their fragment and proxies their backing sequence, both
    /// by reference; a list of objects becomes a new sequence of fragments.
    #[must_use]
    pub fn into_node(self) -> Node {
        match self {
            Value::Literal(node) => node,
            Value::Object(object) => Node::Map(object.fragment().clone()),
            Value::List(list) => Node::Seq(list.sequence().clone()),
            Value::Objects(objects) => Node::Seq(
                objects
                    .iter()
                    .map(|object| Node::Map(object.fragment().clone()))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Literal(value.into())
                }
            }
        )*
    };
}

impl_from_literal!(Node, bool, i64, i32, u32, f64, f32, String, &str, Sequence, Mapping);

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<ListProxy> for Value {
    fn from(list: ListProxy) -> Self {
        Value::List(list)
    }
}

impl From<Vec<Object>> for Value {
    fn from(objects: Vec<Object>) -> Self {
        Value::Objects(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_conversions() {
        assert_eq!(Value::from(2), Value::Literal(Node::Int(2)));
        assert_eq!(Value::from("a"), Value::Literal(Node::Str("a".to_string())));
        assert!(Value::from(Node::Null).is_null());
        assert_eq!(Value::from(1.5).kind(), "float");
    }

    #[test]
    fn test_objects_lower_to_new_sequence() {
        let schema = crate::Schema::builder("Thing").literal("value").build();
        let object = Object::new(schema);
        let node = Value::from(vec![object.clone()]).into_node();
        let list = node.as_sequence().unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.get(0).unwrap().as_mapping().unwrap().ptr_eq(object.fragment()));
    }
}
