//! Typed facades.
//!
//! The [`model!`](crate::model!) macro declares a struct backed by an
//! [`Object`] and generates one accessor per field. Each accessor returns a
//! small handle with `get` and `set`:
//!
//! | Declaration          | Handle          | `get` returns              |
//! |----------------------|-----------------|----------------------------|
//! | `name: Attr`         | [`Attr`]        | `Node`                     |
//! | `name: Attr = expr`  | [`Attr`]        | `Node` (default if absent) |
//! | `name: Another<T>`   | [`Another<T>`]  | `Result<Option<T>>`        |
//! | `name: Many<T>`      | [`Many<T>`]     | `Result<Option<Items<T>>>` |
//! | `name: Unmanaged`    | [`Unmanaged`]   | `Node`                     |
//!
//! ```
//! use yamb::{Model, model};
//!
//! model! {
//!     pub struct Thing {
//!         value: Attr,
//!     }
//! }
//!
//! model! {
//!     pub struct Lots {
//!         things: Many<Thing>,
//!     }
//! }
//!
//! let lots = Lots::load("things:\n- value: 2\n- value: 3\n").unwrap();
//! let things = lots.things().get().unwrap().unwrap();
//! assert_eq!(things.get(1).unwrap().value().get(), 3);
//!
//! things.push(&Thing::new());
//! things.get(2).unwrap().value().set(4).unwrap();
//! assert_eq!(
//!     lots.dump().unwrap(),
//!     "things:\n- value: 2\n- value: 3\n- value: 4\n"
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::AddAssign;
use std::rc::Rc;

use crate::codec::{Codec, Yaml};
use crate::descriptor::{Descriptor, literal_value};
use crate::error::Result;
use crate::list::ListProxy;
use crate::node::{Mapping, Node};
use crate::object::Object;
use crate::schema::Schema;
use crate::value::Value;

/// A typed facade class.
///
/// Implemented by [`model!`](crate::model!); implementing it by hand only
/// requires the three required methods.
pub trait Model: Sized {
    /// The class schema, built once per thread.
    fn schema() -> Rc<Schema>;

    fn from_object(object: Object) -> Self;

    fn as_object(&self) -> &Object;

    fn into_object(self) -> Object {
        self.as_object().clone()
    }

    /// An instance with an empty fragment.
    fn new() -> Self {
        Self::from_object(Object::new(Self::schema()))
    }

    /// See [`Object::with_fields`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFields` for undeclared names.
    fn with_fields<I, K>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Object::with_fields(Self::schema(), fields).map(Self::from_object)
    }

    /// See [`Object::from_node`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedType` if the tree is not a mapping.
    fn from_node(node: Node) -> Result<Self> {
        Object::from_node(Self::schema(), node).map(Self::from_object)
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// See [`Object::load`].
    fn load(text: &str) -> Result<Self> {
        Self::load_with(text, &Yaml)
    }

    /// Parse a document through any codec.
    ///
    /// # Errors
    ///
    /// See [`Object::load`].
    fn load_with(text: &str, codec: &dyn Codec) -> Result<Self> {
        Object::load_with(Self::schema(), text, codec).map(Self::from_object)
    }

    /// Emit this instance as a YAML document.
    ///
    /// # Errors
    ///
    /// See [`Object::dump`].
    fn dump(&self) -> Result<String> {
        self.as_object().dump()
    }

    /// Emit this instance through any codec.
    ///
    /// # Errors
    ///
    /// See [`Object::dump`].
    fn dump_with(&self, codec: &dyn Codec) -> Result<String> {
        self.as_object().dump_with(codec)
    }

    fn fragment(&self) -> &Mapping {
        self.as_object().fragment()
    }

    /// This instance as a field value, for constructors and `Object::set`.
    fn to_value(&self) -> Value {
        Value::Object(self.as_object().clone())
    }
}

/// Handle to a literal field.
#[derive(Clone, Copy)]
pub struct Attr<'a> {
    object: &'a Object,
    name: &'static str,
}

impl<'a> Attr<'a> {
    #[doc(hidden)]
    #[must_use]
    pub fn new(object: &'a Object, name: &'static str) -> Self {
        Self { object, name }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value, or the declared default when absent or null.
    #[must_use]
    pub fn get(&self) -> Node {
        let raw = self.object.fragment().get(self.name).unwrap_or_default();
        match self.object.schema().field(self.name) {
            Some(Descriptor::Literal { default }) => literal_value(default, raw),
            _ => raw,
        }
    }

    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the field is not declared.
    pub fn set(&self, value: impl Into<Node>) -> Result<()> {
        self.object.set(self.name, Value::Literal(value.into()))
    }
}

impl fmt::Debug for Attr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Attr").field(&self.get()).finish()
    }
}

/// Handle to an unmanaged field.
#[derive(Clone, Copy, Debug)]
pub struct Unmanaged<'a> {
    object: &'a Object,
    name: &'static str,
}

impl<'a> Unmanaged<'a> {
    #[doc(hidden)]
    #[must_use]
    pub fn new(object: &'a Object, name: &'static str) -> Self {
        Self { object, name }
    }

    #[must_use]
    pub fn get(&self) -> Node {
        self.object.plain(self.name).unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the name is not declared unmanaged.
    pub fn set(&self, value: impl Into<Node>) -> Result<()> {
        self.object.set(self.name, Value::Literal(value.into()))
    }
}

/// Handle to a nested-object field.
pub struct Another<'a, T> {
    object: &'a Object,
    name: &'static str,
    target: PhantomData<T>,
}

impl<'a, T: Model> Another<'a, T> {
    #[doc(hidden)]
    #[must_use]
    pub fn new(object: &'a Object, name: &'static str) -> Self {
        Self {
            object,
            name,
            target: PhantomData,
        }
    }

    /// The nested object, or `None` when absent or null.
    ///
    /// The returned facade shares its fragment with the parent.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedType` if the raw value is not a mapping.
    pub fn get(&self) -> Result<Option<T>> {
        match self.object.get(self.name)? {
            Value::Object(object) => Ok(Some(T::from_object(object))),
            _ => Ok(None),
        }
    }

    /// Store `value`'s fragment (by reference) under this field.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the field is not declared.
    pub fn set(&self, value: &T) -> Result<()> {
        self.object.set(self.name, value.to_value())
    }

    /// Write null.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the field is not declared.
    pub fn clear(&self) -> Result<()> {
        self.object.set(self.name, Value::Literal(Node::Null))
    }
}

/// Handle to a collection field.
pub struct Many<'a, T> {
    object: &'a Object,
    name: &'static str,
    target: PhantomData<T>,
}

impl<'a, T: Model> Many<'a, T> {
    #[doc(hidden)]
    #[must_use]
    pub fn new(object: &'a Object, name: &'static str) -> Self {
        Self {
            object,
            name,
            target: PhantomData,
        }
    }

    /// A live view over the collection, or `None` when absent or null.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedType` if the raw value is not a sequence.
    pub fn get(&self) -> Result<Option<Items<T>>> {
        match self.object.get(self.name)? {
            Value::List(proxy) => Ok(Some(Items::new(proxy))),
            _ => Ok(None),
        }
    }

    /// Replace the whole collection with a new list of `items`' fragments.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the field is not declared.
    pub fn set<I: IntoIterator<Item = T>>(&self, items: I) -> Result<()> {
        let objects = items.into_iter().map(Model::into_object).collect();
        self.object.set(self.name, Value::Objects(objects))
    }

    /// Write null.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the field is not declared.
    pub fn clear(&self) -> Result<()> {
        self.object.set(self.name, Value::Literal(Node::Null))
    }
}

/// Typed view over a [`ListProxy`].
pub struct Items<T> {
    proxy: ListProxy,
    target: PhantomData<T>,
}

impl<T: Model> Items<T> {
    #[must_use]
    pub fn new(proxy: ListProxy) -> Self {
        Self {
            proxy,
            target: PhantomData,
        }
    }

    #[must_use]
    pub fn proxy(&self) -> &ListProxy {
        &self.proxy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.proxy.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proxy.is_empty()
    }

    /// # Errors
    ///
    /// See [`ListProxy::get`].
    pub fn get(&self, index: usize) -> Result<T> {
        self.proxy.get(index).map(T::from_object)
    }

    /// # Errors
    ///
    /// See [`ListProxy::set`].
    pub fn set(&self, index: usize, item: &T) -> Result<()> {
        self.proxy.set(index, item.as_object())
    }

    /// # Errors
    ///
    /// See [`ListProxy::remove`].
    pub fn remove(&self, index: usize) -> Result<()> {
        self.proxy.remove(index)
    }

    /// # Errors
    ///
    /// See [`ListProxy::insert`].
    pub fn insert(&self, index: usize, item: &T) -> Result<()> {
        self.proxy.insert(index, item.as_object())
    }

    pub fn push(&self, item: &T) {
        self.proxy.push(item.as_object());
    }

    pub fn extend<I: IntoIterator<Item = T>>(&self, items: I) {
        self.proxy.extend(items.into_iter().map(Model::into_object));
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        self.proxy.iter().map(|item| item.map(T::from_object))
    }
}

impl<T: Model> AddAssign<Vec<T>> for Items<T> {
    fn add_assign(&mut self, items: Vec<T>) {
        self.extend(items);
    }
}

impl<T> Clone for Items<T> {
    fn clone(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
            target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Items<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Items").field(&self.proxy).finish()
    }
}

/// Declare a typed facade class.
///
/// ```
/// use yamb::{Model, model};
///
/// model! {
///     /// A node with optional children.
///     pub struct Tree {
///         label: Attr = "",
///         weight: Attr = 0,
///         parent_note: Unmanaged,
///         children: Many<Tree>,
///         first: Another<Tree>,
///     }
/// }
///
/// let tree = Tree::load("label: root\nchildren:\n- label: leaf\n").unwrap();
/// assert_eq!(tree.weight().get(), 0);
/// let children = tree.children().get().unwrap().unwrap();
/// assert_eq!(children.get(0).unwrap().label().get(), "leaf");
/// assert!(tree.first().get().unwrap().is_none());
/// ```
///
/// The generated struct derives `Clone`, `Debug` and `PartialEq`; do not
/// derive them again. Field names shadow the provided [`Model`] methods of
/// the same name.
#[macro_export]
macro_rules! model {
    (@descriptor Attr) => {
        $crate::Descriptor::literal()
    };
    (@descriptor Attr = $default:expr) => {
        $crate::Descriptor::literal_with_default($default)
    };
    (@descriptor Another<$target:ty>) => {
        $crate::Descriptor::nested($crate::SchemaRef::of::<$target>())
    };
    (@descriptor Many<$target:ty>) => {
        $crate::Descriptor::collection($crate::SchemaRef::of::<$target>())
    };

    (@declare $builder:ident, $field:ident : Unmanaged) => {
        $builder.unmanaged(stringify!($field), $crate::Node::Null)
    };
    (@declare $builder:ident, $field:ident : Unmanaged = $default:expr) => {
        $builder.unmanaged(stringify!($field), $default)
    };
    (@declare $builder:ident, $field:ident : $($kind:tt)+) => {
        $builder.field(stringify!($field), $crate::model!(@descriptor $($kind)+))
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : Attr) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Attr<'_> {
            $crate::Attr::new(&self.0, stringify!($field))
        }
    };
    (@accessor $(#[$fmeta:meta])* $field:ident : Unmanaged) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Unmanaged<'_> {
            $crate::Unmanaged::new(&self.0, stringify!($field))
        }
    };
    (@accessor $(#[$fmeta:meta])* $field:ident : Another<$target:ty>) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Another<'_, $target> {
            $crate::Another::new(&self.0, stringify!($field))
        }
    };
    (@accessor $(#[$fmeta:meta])* $field:ident : Many<$target:ty>) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Many<'_, $target> {
            $crate::Many::new(&self.0, stringify!($field))
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $kind:ident $(<$target:ty>)? $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name($crate::Object);

        impl $crate::Model for $name {
            fn schema() -> ::std::rc::Rc<$crate::Schema> {
                ::std::thread_local! {
                    static SCHEMA: ::std::rc::Rc<$crate::Schema> = {
                        let builder = $crate::Schema::builder(stringify!($name));
                        $(
                            let builder = $crate::model!(
                                @declare builder, $field : $kind $(<$target>)? $(= $default)?
                            );
                        )*
                        builder.build()
                    };
                }
                SCHEMA.with(::std::rc::Rc::clone)
            }

            fn from_object(object: $crate::Object) -> Self {
                Self(object)
            }

            fn as_object(&self) -> &$crate::Object {
                &self.0
            }
        }

        impl $name {
            $(
                $crate::model!(@accessor $(#[$fmeta])* $field : $kind $(<$target>)?);
            )*
        }
    };
}
