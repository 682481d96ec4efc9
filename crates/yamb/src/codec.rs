//! Text codecs for document trees.
//!
//! A [`Codec`] turns text into a [`Node`] tree and back. Two codecs are
//! provided:
//!
//! | Codec    | Backend      | Notes                                   |
//! |----------|--------------|-----------------------------------------|
//! | [`Yaml`] | `serde_yaml` | reference format; tags are dropped      |
//! | [`Json`] | `serde_json` | non-finite floats are rejected on emit  |
//!
//! [`Format`] picks one of them at runtime.
//!
//! # Example
//!
//! ```
//! use yamb::codec::{Codec, Json, Yaml};
//!
//! let tree = Yaml.parse("name: alice\nage: 30\n").unwrap();
//! let json = Json::default().emit(&tree).unwrap();
//! assert_eq!(json, r#"{"age":30,"name":"alice"}"#);
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::node::{Mapping, Node, Sequence};

/// Converts between document text and [`Node`] trees.
pub trait Codec {
    /// Parse text into a fresh tree.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is malformed for this format.
    fn parse(&self, text: &str) -> Result<Node>;

    /// Serialize a tree to text.
    ///
    /// # Errors
    ///
    /// Returns a serialize error if the tree cannot be represented.
    fn emit(&self, node: &Node) -> Result<String>;
}

/// YAML codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Yaml;

impl Codec for Yaml {
    fn parse(&self, text: &str) -> Result<Node> {
        let value: YamlValue =
            serde_yaml::from_str(text).map_err(|e| Error::YamlParse(e.to_string()))?;
        node_from_yaml(value)
    }

    fn emit(&self, node: &Node) -> Result<String> {
        serde_yaml::to_string(&node_to_yaml(node)).map_err(|e| Error::YamlSerialize(e.to_string()))
    }
}

/// JSON codec, compact by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json {
    pretty: bool,
}

impl Json {
    /// JSON codec emitting indented output.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for Json {
    fn parse(&self, text: &str) -> Result<Node> {
        let value: JsonValue =
            serde_json::from_str(text).map_err(|e| Error::JsonParse(e.to_string()))?;
        Ok(node_from_json(value))
    }

    fn emit(&self, node: &Node) -> Result<String> {
        let value = node_to_json(node)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|e| Error::JsonSerialize(e.to_string()))
    }
}

/// Runtime choice of codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Codec for Format {
    fn parse(&self, text: &str) -> Result<Node> {
        match self {
            Format::Yaml => Yaml.parse(text),
            Format::Json => Json::default().parse(text),
        }
    }

    fn emit(&self, node: &Node) -> Result<String> {
        match self {
            Format::Yaml => Yaml.emit(node),
            Format::Json => Json::default().emit(node),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
        }
    }
}

// --- YAML helpers ---

fn node_from_yaml(value: YamlValue) -> Result<Node> {
    match value {
        YamlValue::Null => Ok(Node::Null),
        YamlValue::Bool(b) => Ok(Node::Bool(b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Node::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Node::Float(f))
            } else {
                Ok(Node::Float(0.0))
            }
        }
        YamlValue::String(s) => Ok(Node::Str(s)),
        YamlValue::Sequence(items) => items
            .into_iter()
            .map(node_from_yaml)
            .collect::<Result<Vec<_>>>()
            .map(Node::from),
        YamlValue::Mapping(entries) => {
            let map = Mapping::new();
            for (key, value) in entries {
                map.insert(yaml_key(key)?, node_from_yaml(value)?);
            }
            Ok(Node::Map(map))
        }
        // Tags carry no meaning for the facade; keep the tagged value.
        YamlValue::Tagged(tagged) => node_from_yaml(tagged.value),
    }
}

/// Scalar keys are flattened to their plain YAML spelling (`80` -> `"80"`,
/// `~` -> `"null"`). The original key type is not kept.
fn yaml_key(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(Error::NonStringKey(format!("{other:?}"))),
    }
}

fn node_to_yaml(node: &Node) -> YamlValue {
    match node {
        Node::Null => YamlValue::Null,
        Node::Bool(b) => YamlValue::Bool(*b),
        Node::Int(i) => YamlValue::Number((*i).into()),
        Node::Float(f) => YamlValue::Number((*f).into()),
        Node::Str(s) => YamlValue::String(s.clone()),
        Node::Seq(seq) => YamlValue::Sequence(seq.to_vec().iter().map(node_to_yaml).collect()),
        Node::Map(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (key, value) in map.entries() {
                out.insert(YamlValue::String(key), node_to_yaml(&value));
            }
            YamlValue::Mapping(out)
        }
    }
}

// --- JSON helpers ---

fn node_from_json(value: JsonValue) -> Node {
    match value {
        JsonValue::Null => Node::Null,
        JsonValue::Bool(b) => Node::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Int(i)
            } else if let Some(f) = n.as_f64() {
                Node::Float(f)
            } else {
                Node::Float(0.0)
            }
        }
        JsonValue::String(s) => Node::Str(s),
        JsonValue::Array(items) => Node::Seq(items.into_iter().map(node_from_json).collect::<Sequence>()),
        JsonValue::Object(obj) => Node::Map(
            obj.into_iter()
                .map(|(k, v)| (k, node_from_json(v)))
                .collect(),
        ),
    }
}

fn node_to_json(node: &Node) -> Result<JsonValue> {
    match node {
        Node::Null => Ok(JsonValue::Null),
        Node::Bool(b) => Ok(JsonValue::Bool(*b)),
        Node::Int(i) => Ok(JsonValue::Number((*i).into())),
        Node::Float(f) => {
            let num = serde_json::Number::from_f64(*f).ok_or(Error::NonFiniteFloat(*f))?;
            Ok(JsonValue::Number(num))
        }
        Node::Str(s) => Ok(JsonValue::String(s.clone())),
        Node::Seq(seq) => seq
            .to_vec()
            .iter()
            .map(node_to_json)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        Node::Map(map) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in map.entries() {
                obj.insert(key, node_to_json(&value)?);
            }
            Ok(JsonValue::Object(obj))
        }
    }
}
