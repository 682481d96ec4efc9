//! Dynamic facade instances.
//!
//! An [`Object`] pairs a [`Schema`] with exactly one raw fragment (a
//! [`Mapping`]). Declared fields are computed on every access: reads go
//! through the field's descriptor `load`, writes through its `dump`, and
//! nothing converted is ever cached on the instance.
//!
//! Loading and dumping come in two levels:
//!
//! | Level  | Load                       | Dump                           |
//! |--------|----------------------------|--------------------------------|
//! | top    | [`Object::load`] parses text | [`Object::dump`] emits text  |
//! | nested | [`Object::from_node`] wraps a tree | [`Object::fragment`] returns the fragment |
//!
//! Nested fields and collections only ever use the nested level, so text is
//! parsed and emitted once per document.
//!
//! # Example
//!
//! ```
//! use yamb::{Object, Schema, Value};
//!
//! let thing = Schema::builder("Thing").literal("value").build();
//! let lots = Schema::builder("Lots").collection("things", thing.clone()).build();
//!
//! let a = Object::with_fields(thing.clone(), [("value", Value::from(2))]).unwrap();
//! let b = Object::with_fields(thing, [("value", Value::from(3))]).unwrap();
//! let doc = Object::with_fields(lots, [("things", Value::from(vec![a, b]))]).unwrap();
//!
//! assert_eq!(doc.dump().unwrap(), "things:\n- value: 2\n- value: 3\n");
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::codec::{Codec, Yaml};
use crate::error::{Error, Result};
use crate::node::{Mapping, Node};
use crate::schema::Schema;
use crate::value::Value;

/// A facade over one document fragment.
///
/// Cloning an `Object` gives another handle to the same instance: both see
/// the same fragment and the same unmanaged values.
#[derive(Clone)]
pub struct Object {
    schema: Rc<Schema>,
    fragment: Mapping,
    unmanaged: Rc<RefCell<BTreeMap<String, Node>>>,
}

impl Object {
    /// Create an instance with an empty fragment.
    #[must_use]
    pub fn new(schema: Rc<Schema>) -> Self {
        Self::wrap(schema, Mapping::new())
    }

    /// Wrap an existing fragment without any conversion.
    #[must_use]
    pub fn wrap(schema: Rc<Schema>, fragment: Mapping) -> Self {
        Self {
            schema,
            fragment,
            unmanaged: Rc::default(),
        }
    }

    /// Create an instance from facade-level field values.
    ///
    /// Every value is dumped into a fresh fragment right away. Declared
    /// fields that are not given stay absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFields` listing every name the schema does not
    /// declare, or the first dump error of a mis-shaped value.
    pub fn with_fields<I, K>(schema: Rc<Schema>, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let fields: Vec<(String, Value)> = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        let unknown: Vec<String> = fields
            .iter()
            .filter(|(name, _)| !schema.is_field(name))
            .map(|(name, _)| name.clone())
            .collect();
        if !unknown.is_empty() {
            debug!(class = schema.name(), fields = ?unknown, "rejected unknown fields");
            return Err(Error::UnknownFields {
                class: schema.name().to_string(),
                fields: unknown,
            });
        }

        let fragment = Mapping::new();
        for (name, value) in fields {
            if let Some(descriptor) = schema.field(&name) {
                fragment.insert(name, descriptor.dump(value)?);
            }
        }
        Ok(Self::wrap(schema, fragment))
    }

    /// Nested-level load: wrap an already parsed tree.
    ///
    /// A null tree (an empty document) gives an empty instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedType` if the tree is neither a mapping nor null.
    pub fn from_node(schema: Rc<Schema>, node: Node) -> Result<Self> {
        match node {
            Node::Map(fragment) => Ok(Self::wrap(schema, fragment)),
            Node::Null => Ok(Self::new(schema)),
            other => Err(Error::UnexpectedType {
                expected: "mapping",
                found: other.kind(),
            }),
        }
    }

    /// Top-level load of a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed text, or `Error::UnexpectedType`
    /// if the document is not a mapping.
    pub fn load(schema: Rc<Schema>, text: &str) -> Result<Self> {
        Self::load_with(schema, text, &Yaml)
    }

    /// Top-level load through any codec.
    ///
    /// # Errors
    ///
    /// See [`Object::load`].
    pub fn load_with(schema: Rc<Schema>, text: &str, codec: &dyn Codec) -> Result<Self> {
        let tree = codec.parse(text)?;
        debug!(class = schema.name(), kind = tree.kind(), "loaded document");
        Self::from_node(schema, tree)
    }

    /// Top-level dump to YAML.
    ///
    /// # Errors
    ///
    /// Returns a serialize error if the fragment cannot be emitted.
    pub fn dump(&self) -> Result<String> {
        self.dump_with(&Yaml)
    }

    /// Top-level dump through any codec.
    ///
    /// # Errors
    ///
    /// See [`Object::dump`].
    pub fn dump_with(&self, codec: &dyn Codec) -> Result<String> {
        debug!(class = self.class_name(), "dumping document");
        codec.emit(&Node::Map(self.fragment.clone()))
    }

    /// Nested-level dump: the backing fragment itself.
    #[inline]
    #[must_use]
    pub fn fragment(&self) -> &Mapping {
        &self.fragment
    }

    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.schema.name()
    }

    /// Check whether two facades wrap the same fragment.
    #[must_use]
    pub fn same_fragment(&self, other: &Object) -> bool {
        self.fragment.ptr_eq(&other.fragment)
    }

    /// Read a field.
    ///
    /// Declared fields are loaded from the fragment on every call. Unmanaged
    /// fields give the instance value, or the class default when unset.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` for any other name, or the
    /// descriptor's error if the raw value is mis-shaped.
    pub fn get(&self, name: &str) -> Result<Value> {
        if let Some(descriptor) = self.schema.field(name) {
            return descriptor.load(self.fragment.get(name));
        }
        match self.plain(name) {
            Some(node) => Ok(Value::Literal(node)),
            None => Err(self.unknown_attribute(name)),
        }
    }

    /// Write a field.
    ///
    /// Declared fields store the descriptor's dump in the fragment; unmanaged
    /// fields store the value on the instance only. A failed write leaves the
    /// instance untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` for any other name, or the
    /// descriptor's error if the value has the wrong shape.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        if let Some(descriptor) = self.schema.field(name) {
            let raw = descriptor.dump(value.into())?;
            self.fragment.insert(name, raw);
            return Ok(());
        }
        if self.schema.is_unmanaged(name) {
            self.unmanaged
                .borrow_mut()
                .insert(name.to_string(), value.into().into_node());
            return Ok(());
        }
        Err(self.unknown_attribute(name))
    }

    /// Value of an unmanaged field, or `None` if `name` is not unmanaged.
    #[must_use]
    pub fn plain(&self, name: &str) -> Option<Node> {
        if let Some(node) = self.unmanaged.borrow().get(name) {
            return Some(node.clone());
        }
        self.schema.unmanaged_default(name).map(Node::deep_copy)
    }

    fn unknown_attribute(&self, name: &str) -> Error {
        debug!(class = self.class_name(), name, "rejected unknown attribute");
        Error::UnknownAttribute {
            class: self.class_name().to_string(),
            name: name.to_string(),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.class_name() == other.class_name() && self.fragment == other.fragment
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.class_name());
        for (name, value) in self.fragment.entries() {
            out.field(&name, &value);
        }
        out.finish()
    }
}
