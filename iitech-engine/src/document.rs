//! Transformation documents
//!
//!     A transformation document is YAML. The usual shape maps identifiers to specifier groups:
//!
//!         top:
//!           image: images/eid.jpg
//!           caption: { italics: Eid Mubarak }
//!         Jamati News:
//!           append: Registration closes Friday.
//!
//!     A list of such mappings is also accepted and flattened in order. Repeating an identifier
//!     as a key of the top-level mapping works the same way: every occurrence becomes its own
//!     entry, in document order.
//!
//!     Loading never fails because of one bad entry: each entry keeps its own parse result and
//!     the orchestrator reports it. A key repeated inside one specifier group fails only that
//!     entry. Only text that is not YAML, or a top level of the wrong shape, is a
//!     [`DocumentError`].

use crate::error::{ConfigErrorKind, DocumentError};
use crate::transform::TransformationEntry;
use serde::de::{Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml::{Mapping, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationDocument {
    entries: Vec<TransformationEntry>,
}

impl TransformationDocument {
    pub fn from_yaml(source: &str) -> Result<Self, DocumentError> {
        let root = Node::deserialize(serde_yaml::Deserializer::from_str(source))?;
        let mut entries = Vec::new();
        match root {
            Node::Scalar(Value::Null) => {}
            Node::Mapping(pairs) => push_entries(&mut entries, pairs)?,
            Node::Sequence(items) => {
                for item in items {
                    match item {
                        Node::Mapping(pairs) => push_entries(&mut entries, pairs)?,
                        _ => return Err(DocumentError::InvalidShape),
                    }
                }
            }
            Node::Scalar(_) => return Err(DocumentError::InvalidShape),
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TransformationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose specifier group could not be parsed.
    pub fn errors(&self) -> impl Iterator<Item = &TransformationEntry> {
        self.entries.iter().filter(|entry| entry.parsed.is_err())
    }
}

fn push_entries(
    entries: &mut Vec<TransformationEntry>,
    pairs: Vec<(Node, Node)>,
) -> Result<(), DocumentError> {
    for (key, group) in pairs {
        let identifier = match key {
            Node::Scalar(value) => identifier(&value)?,
            Node::Sequence(_) => return Err(invalid_identifier("a list")),
            Node::Mapping(_) => return Err(invalid_identifier("a mapping")),
        };
        let entry = match group.into_value() {
            Ok(group) => TransformationEntry::parse(identifier, &group),
            Err(key) => {
                tracing::debug!(identifier = %identifier, key = %key, "repeated key in specifier group");
                TransformationEntry {
                    identifier,
                    parsed: Err(ConfigErrorKind::DuplicateKey { key }.into()),
                }
            }
        };
        entries.push(entry);
    }
    Ok(())
}

fn identifier(key: &Value) -> Result<String, DocumentError> {
    match key {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(invalid_identifier(kind_name(other))),
    }
}

fn invalid_identifier(found: &str) -> DocumentError {
    DocumentError::InvalidIdentifier {
        found: found.to_string(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// A YAML node as written. Unlike [`Value`], a mapping keeps every entry, repeated keys
/// included, so the loader decides what a repeat means. Tags are dropped.
enum Node {
    Scalar(Value),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

impl Node {
    /// Convert to a [`Value`], or return the first key repeated within one mapping.
    fn into_value(self) -> Result<Value, String> {
        match self {
            Node::Scalar(value) => Ok(value),
            Node::Sequence(items) => items
                .into_iter()
                .map(Node::into_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            Node::Mapping(pairs) => {
                let mut mapping = Mapping::new();
                for (key, value) in pairs {
                    let key = key.into_value()?;
                    if mapping.contains_key(&key) {
                        return Err(identifier(&key).unwrap_or_else(|_| kind_name(&key).to_string()));
                    }
                    mapping.insert(key, value.into_value()?);
                }
                Ok(Value::Mapping(mapping))
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML node")
    }

    fn visit_bool<E>(self, flag: bool) -> Result<Node, E> {
        Ok(Node::Scalar(Value::Bool(flag)))
    }

    fn visit_i64<E>(self, number: i64) -> Result<Node, E> {
        Ok(Node::Scalar(Value::Number(number.into())))
    }

    fn visit_u64<E>(self, number: u64) -> Result<Node, E> {
        Ok(Node::Scalar(Value::Number(number.into())))
    }

    fn visit_f64<E>(self, number: f64) -> Result<Node, E> {
        Ok(Node::Scalar(Value::Number(number.into())))
    }

    fn visit_str<E>(self, text: &str) -> Result<Node, E> {
        Ok(Node::Scalar(Value::String(text.to_owned())))
    }

    fn visit_string<E>(self, text: String) -> Result<Node, E> {
        Ok(Node::Scalar(Value::String(text)))
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Scalar(Value::Null))
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Scalar(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut pairs = Vec::new();
        while let Some(pair) = map.next_entry()? {
            pairs.push(pair);
        }
        Ok(Node::Mapping(pairs))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Node, A::Error> {
        let (_tag, variant): (String, _) = data.variant()?;
        variant.newtype_variant()
    }
}
