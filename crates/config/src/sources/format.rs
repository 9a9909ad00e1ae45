//! File formats and the flattening of documents into configuration keys

use crate::core::path::KEY_DELIMITER;
use crate::core::{ConfigError, ConfigResult, KeyValueData};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Configuration file format
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    /// JSON format
    Json,

    /// TOML format
    Toml,

    /// YAML format
    Yaml,
}

impl FileFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Toml => "toml",
            FileFormat::Yaml => "yml",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "yml" | "yaml" => Some(FileFormat::Yaml),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse file content into flat configuration data.
    ///
    /// Repeated keys are a parse error, whether exact or differing only in
    /// case. A JSON document must have an object at the root; an empty TOML
    /// or YAML document yields no keys.
    pub fn parse(&self, content: &str, path: &str) -> ConfigResult<KeyValueData> {
        let document = match self {
            FileFormat::Json => serde_json::from_str::<Node>(content)
                .map_err(|e| ConfigError::parse_error(path, format!("JSON parse error: {e}")))?,
            #[cfg(feature = "toml")]
            FileFormat::Toml => toml::from_str::<Node>(content)
                .map_err(|e| ConfigError::parse_error(path, format!("TOML parse error: {e}")))?,
            #[cfg(feature = "yaml")]
            FileFormat::Yaml => match serde_yaml::from_str::<Node>(content)
                .map_err(|e| ConfigError::parse_error(path, format!("YAML parse error: {e}")))?
            {
                Node::Null => Node::Object(Vec::new()),
                node => node,
            },
            #[allow(unreachable_patterns)]
            other => return Err(ConfigError::format_not_supported(other.to_string())),
        };

        document.flatten(path)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Json => write!(f, "JSON"),
            FileFormat::Toml => write!(f, "TOML"),
            FileFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Flatten a parsed document into `:`-joined keys.
///
/// The root must be an object. Arrays are keyed by index, scalars are stored
/// as their text, `null` as an empty string. Empty objects and arrays produce
/// no key.
pub fn flatten(document: &Value, path: &str) -> ConfigResult<KeyValueData> {
    Node::from(document).flatten(path)
}

/// Parsed document that keeps every member of an object, in order
#[derive(Debug)]
enum Node {
    Null,
    Scalar(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl Node {
    fn flatten(&self, path: &str) -> ConfigResult<KeyValueData> {
        if !matches!(self, Node::Object(_)) {
            return Err(ConfigError::parse_error(
                path,
                "Top-level element must be an object",
            ));
        }
        let mut data = KeyValueData::new();
        self.visit(&mut Vec::new(), &mut data, path)?;
        Ok(data)
    }

    fn visit(
        &self,
        segments: &mut Vec<String>,
        data: &mut KeyValueData,
        path: &str,
    ) -> ConfigResult<()> {
        match self {
            Node::Object(members) => {
                for (name, child) in members {
                    segments.push(name.clone());
                    child.visit(segments, data, path)?;
                    segments.pop();
                }
            }
            Node::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    segments.push(index.to_string());
                    child.visit(segments, data, path)?;
                    segments.pop();
                }
            }
            Node::Null | Node::Scalar(_) => {
                let key = segments.join(KEY_DELIMITER);
                if data.contains_key(&key) {
                    return Err(ConfigError::parse_error(
                        path,
                        format!("A duplicate key '{key}' was found"),
                    ));
                }
                let text = match self {
                    Node::Scalar(text) => text.clone(),
                    _ => String::new(),
                };
                data.insert(key, text);
            }
        }
        Ok(())
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::String(s) => Node::Scalar(s.clone()),
            Value::Bool(_) | Value::Number(_) => Node::Scalar(value.to_string()),
            Value::Array(items) => Node::Array(items.iter().map(Node::from).collect()),
            Value::Object(map) => Node::Object(
                map.iter()
                    .map(|(name, child)| (name.clone(), Node::from(child)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration document")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        let text = serde_json::Number::from_f64(v).map_or_else(|| v.to_string(), |n| n.to_string());
        Ok(Node::Scalar(text))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members: Vec<(String, Node)> = Vec::new();
        while let Some(name) = map.next_key::<String>()? {
            if members.iter().any(|(seen, _)| *seen == name) {
                return Err(de::Error::custom(format!(
                    "A duplicate key '{name}' was found"
                )));
            }
            let value = map.next_value()?;
            members.push((name, value));
        }
        Ok(Node::Object(members))
    }
}
