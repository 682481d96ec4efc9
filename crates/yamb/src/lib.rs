//! Declarative object facades over YAML and JSON documents.
//!
//! A facade class is a [`Schema`]: a name plus a table of declared fields,
//! each bound to a [`Descriptor`]. An instance ([`Object`]) wraps exactly one
//! raw fragment of a parsed document and converts fields on every access, so
//! the document stays the single source of truth:
//!
//! - literal fields pass raw values through, applying a default when absent;
//! - nested fields return a facade aliasing the sub-fragment;
//! - collection fields return a [`ListProxy`], a live view over the raw list.
//!
//! Typed classes are declared with [`model!`], which generates accessors for
//! each field on top of the same machinery.
//!
//! ```
//! use yamb::{Model, model};
//!
//! model! {
//!     pub struct Foo {
//!         bar: Attr,
//!         baz: Attr = 5,
//!     }
//! }
//!
//! let foo = Foo::load("bar: 1\n").unwrap();
//! assert_eq!(foo.bar().get(), 1);
//! assert_eq!(foo.baz().get(), 5);
//!
//! foo.bar().set("ololo").unwrap();
//! assert_eq!(foo.dump().unwrap(), "bar: ololo\n");
//! ```

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod list;
pub mod model;
pub mod node;
pub mod object;
pub mod schema;
pub mod value;

pub use codec::{Codec, Format, Json, Yaml};
pub use descriptor::{Descriptor, SchemaRef};
pub use error::{Error, Result};
pub use list::ListProxy;
pub use model::{Another, Attr, Items, Many, Model, Unmanaged};
pub use node::{Mapping, Node, Sequence};
pub use object::Object;
pub use schema::{Schema, SchemaBuilder};
pub use value::Value;
