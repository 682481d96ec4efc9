//! Per-field conversion rules.
//!
//! A [`Descriptor`] converts one declared field between its raw value (what
//! is stored in the fragment) and its facade value (what callers see):
//!
//! | Descriptor   | `load(raw)`                         | `dump(value)`                      |
//! |--------------|-------------------------------------|------------------------------------|
//! | `Literal`    | raw, or a copy of the default       | value as-is                        |
//! | `Nested`     | [`Object`] wrapping the raw mapping | the object's own fragment          |
//! | `Collection` | [`ListProxy`] over the raw sequence | a new sequence of object fragments |
//!
//! Nested and collection loads never copy: the facade they return aliases
//! the parent's raw data, so mutations through it land in the parent.

use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::list::ListProxy;
use crate::model::Model;
use crate::node::Node;
use crate::object::Object;
use crate::schema::Schema;
use crate::value::Value;

/// Reference to the schema of a nested class.
///
/// `Deferred` resolves the schema on use, which lets a class refer to itself
/// (or to a class declared later) without building the schema eagerly.
#[derive(Clone)]
pub enum SchemaRef {
    Shared(Rc<Schema>),
    Deferred(fn() -> Rc<Schema>),
}

impl SchemaRef {
    /// Reference to the schema of a typed model.
    #[must_use]
    pub fn of<T: Model>() -> Self {
        SchemaRef::Deferred(T::schema)
    }

    #[must_use]
    pub fn resolve(&self) -> Rc<Schema> {
        match self {
            SchemaRef::Shared(schema) => Rc::clone(schema),
            SchemaRef::Deferred(schema) => schema(),
        }
    }
}

impl From<Rc<Schema>> for SchemaRef {
    fn from(schema: Rc<Schema>) -> Self {
        SchemaRef::Shared(schema)
    }
}

impl From<fn() -> Rc<Schema>> for SchemaRef {
    fn from(schema: fn() -> Rc<Schema>) -> Self {
        SchemaRef::Deferred(schema)
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing a deferred schema could recurse forever on self-referencing classes.
        match self {
            SchemaRef::Shared(schema) => write!(f, "SchemaRef({})", schema.name()),
            SchemaRef::Deferred(_) => write!(f, "SchemaRef(<deferred>)"),
        }
    }
}

/// Conversion rule for one declared field.
#[derive(Clone, Debug)]
pub enum Descriptor {
    /// Scalar or free-form value passed through unchanged.
    Literal { default: Node },
    /// A single nested object.
    Nested(SchemaRef),
    /// A list of nested objects.
    Collection(SchemaRef),
}

impl Descriptor {
    /// Literal field defaulting to null.
    #[must_use]
    pub fn literal() -> Self {
        Descriptor::Literal {
            default: Node::Null,
        }
    }

    #[must_use]
    pub fn literal_with_default(default: impl Into<Node>) -> Self {
        Descriptor::Literal {
            default: default.into(),
        }
    }

    #[must_use]
    pub fn nested(target: impl Into<SchemaRef>) -> Self {
        Descriptor::Nested(target.into())
    }

    #[must_use]
    pub fn collection(target: impl Into<SchemaRef>) -> Self {
        Descriptor::Collection(target.into())
    }

    /// Convert a raw value (`None` when the key is absent) to its facade value.
    ///
    /// Absent and null are treated the same: a literal gets its default, a
    /// nested or collection field reads as `Value::Literal(Node::Null)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedType` if a nested field is not backed by a
    /// mapping or a collection field is not backed by a sequence.
    pub fn load(&self, raw: Option<Node>) -> Result<Value> {
        let raw = raw.unwrap_or_default();
        match self {
            Descriptor::Literal { default } => Ok(Value::Literal(literal_value(default, raw))),
            Descriptor::Nested(_) | Descriptor::Collection(_) if raw.is_null() => {
                Ok(Value::Literal(Node::Null))
            }
            Descriptor::Nested(target) => load_element(target, raw).map(Value::Object),
            Descriptor::Collection(target) => match raw {
                Node::Seq(list) => Ok(Value::List(ListProxy::new(list, target.clone()))),
                other => Err(Error::UnexpectedType {
                    expected: "sequence",
                    found: other.kind(),
                }),
            },
        }
    }

    /// Convert a facade value to the raw value stored in the fragment.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedType` if a nested field is given something
    /// other than an object (or null), or a collection field is given
    /// something other than a list of objects (or null).
    pub fn dump(&self, value: Value) -> Result<Node> {
        match self {
            Descriptor::Literal { .. } => Ok(value.into_node()),
            Descriptor::Nested(_) => match value {
                Value::Object(object) => Ok(dump_element(&object)),
                Value::Literal(Node::Null) => Ok(Node::Null),
                other => Err(Error::UnexpectedType {
                    expected: "object",
                    found: other.kind(),
                }),
            },
            Descriptor::Collection(_) => match value {
                Value::Objects(objects) => Ok(Node::Seq(objects.iter().map(dump_element).collect())),
                // Proxy elements are already raw fragments; re-list them by reference.
                Value::List(proxy) => Ok(Node::Seq(proxy.sequence().to_vec().into_iter().collect())),
                Value::Literal(Node::Null) => Ok(Node::Null),
                other => Err(Error::UnexpectedType {
                    expected: "list of objects",
                    found: other.kind(),
                }),
            },
        }
    }
}

/// Literal read rule: null means "use a fresh copy of the default".
pub(crate) fn literal_value(default: &Node, raw: Node) -> Node {
    if raw.is_null() {
        default.deep_copy()
    } else {
        raw
    }
}

/// Element-level load shared by nested fields and sequence proxies.
pub(crate) fn load_element(target: &SchemaRef, raw: Node) -> Result<Object> {
    match raw {
        Node::Map(fragment) => Ok(Object::wrap(target.resolve(), fragment)),
        other => Err(Error::UnexpectedType {
            expected: "mapping",
            found: other.kind(),
        }),
    }
}

/// Element-level dump: the object's fragment, by reference.
pub(crate) fn dump_element(object: &Object) -> Node {
    Node::Map(object.fragment().clone())
}
