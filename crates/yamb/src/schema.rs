//! Class schemas.
//!
//! A [`Schema`] is the frozen table of a class: its name, the declared fields
//! with their [`Descriptor`]s, and the unmanaged fields. Unmanaged fields are
//! names a facade accepts as plain per-instance values that never reach the
//! document.
//!
//! ```
//! use yamb::{Descriptor, Schema};
//!
//! let thing = Schema::builder("Thing").literal("value").build();
//! let lots = Schema::builder("Lots")
//!     .collection("things", thing)
//!     .unmanaged("note", "")
//!     .build();
//!
//! assert!(matches!(lots.field("things"), Some(Descriptor::Collection(_))));
//! assert!(lots.is_unmanaged("note"));
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::descriptor::{Descriptor, SchemaRef};
use crate::node::Node;

/// Immutable field table of a facade class.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: BTreeMap<String, Descriptor>,
    unmanaged: BTreeMap<String, Node>,
}

impl Schema {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: BTreeMap::new(),
            unmanaged: BTreeMap::new(),
        }
    }

    /// Class name, used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor of a declared field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Descriptor> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn is_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn is_unmanaged(&self, name: &str) -> bool {
        self.unmanaged.contains_key(name)
    }

    /// Class-level default of an unmanaged field.
    #[must_use]
    pub fn unmanaged_default(&self, name: &str) -> Option<&Node> {
        self.unmanaged.get(name)
    }

    /// Declared field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Collects field declarations for a [`Schema`].
///
/// Declaring a name twice keeps the last declaration, whether it is a field
/// or an unmanaged name.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: BTreeMap<String, Descriptor>,
    unmanaged: BTreeMap<String, Node>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        let name = name.into();
        self.unmanaged.remove(&name);
        self.fields.insert(name, descriptor);
        self
    }

    #[must_use]
    pub fn literal(self, name: impl Into<String>) -> Self {
        self.field(name, Descriptor::literal())
    }

    #[must_use]
    pub fn literal_with_default(self, name: impl Into<String>, default: impl Into<Node>) -> Self {
        self.field(name, Descriptor::literal_with_default(default))
    }

    #[must_use]
    pub fn nested(self, name: impl Into<String>, target: impl Into<SchemaRef>) -> Self {
        self.field(name, Descriptor::nested(target))
    }

    #[must_use]
    pub fn collection(self, name: impl Into<String>, target: impl Into<SchemaRef>) -> Self {
        self.field(name, Descriptor::collection(target))
    }

    /// Declare a name stored on the instance only, never in the document.
    #[must_use]
    pub fn unmanaged(mut self, name: impl Into<String>, default: impl Into<Node>) -> Self {
        let name = name.into();
        self.fields.remove(&name);
        self.unmanaged.insert(name, default.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Rc<Schema> {
        Rc::new(Schema {
            name: self.name,
            fields: self.fields,
            unmanaged: self.unmanaged,
        })
    }
}
