//! YAML node → descriptor AST
//!
//!     Parsing is pure and works on an already-loaded [`serde_yaml::Value`]. Errors are returned
//!     as bare [`ConfigErrorKind`]s; the caller attaches the specifier they were found under.

use super::ast::{ContentDescriptor, DescriptorKind, Paragraph};
use crate::error::ConfigErrorKind;
use serde_yaml::{Mapping, Value};

const TEXT_KEY: &str = "text";
const CAPTION_KEY: &str = "caption";

/// Parse a single content descriptor.
pub fn parse_descriptor(node: &Value) -> Result<ContentDescriptor, ConfigErrorKind> {
    match node {
        Value::Null => Ok(ContentDescriptor::Sequence(Vec::new())),
        Value::Bool(flag) => Ok(ContentDescriptor::Text(flag.to_string())),
        Value::Number(number) => Ok(ContentDescriptor::Text(number.to_string())),
        Value::String(text) => Ok(ContentDescriptor::Text(text.clone())),
        Value::Sequence(items) => items
            .iter()
            .map(parse_descriptor)
            .collect::<Result<Vec<_>, _>>()
            .map(ContentDescriptor::Sequence),
        Value::Mapping(group) => parse_attribute_group(group),
        Value::Tagged(tagged) => parse_descriptor(&tagged.value),
    }
}

/// Parse the value of a body specifier into a list of paragraphs.
///
/// A scalar or attribute group is a single paragraph. A list holds one paragraph per element,
/// and an element that is itself a list is a paragraph of several descriptors.
pub fn parse_paragraphs(node: &Value) -> Result<Vec<Paragraph>, ConfigErrorKind> {
    match node {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items.iter().map(parse_paragraph).collect(),
        Value::Tagged(tagged) => parse_paragraphs(&tagged.value),
        other => Ok(vec![parse_paragraph(other)?]),
    }
}

fn parse_paragraph(node: &Value) -> Result<Paragraph, ConfigErrorKind> {
    match node {
        Value::Sequence(items) => items
            .iter()
            .map(parse_descriptor)
            .collect::<Result<Vec<_>, _>>()
            .map(Paragraph::new),
        other => Ok(Paragraph::single(parse_descriptor(other)?)),
    }
}

fn parse_attribute_group(group: &Mapping) -> Result<ContentDescriptor, ConfigErrorKind> {
    let mut kinds: Vec<(DescriptorKind, &Value)> = Vec::new();
    let mut text = None;
    let mut caption = None;

    for (key, value) in group {
        let key = key_name(key)?;
        match key.as_str() {
            TEXT_KEY => text = Some(value),
            CAPTION_KEY => caption = Some(value),
            other => match DescriptorKind::from_key(other) {
                Some(kind) => kinds.push((kind, value)),
                None => {
                    return Err(ConfigErrorKind::UnknownDescriptorKey {
                        key: other.to_string(),
                    })
                }
            },
        }
    }

    let (kind, value) = match kinds.as_slice() {
        [] => return Err(ConfigErrorKind::MissingDescriptorKind),
        [single] => *single,
        _ => {
            return Err(ConfigErrorKind::AmbiguousDescriptor {
                kinds: kinds
                    .iter()
                    .map(|(kind, _)| kind.key().to_string())
                    .collect(),
            })
        }
    };

    if text.is_some() && !kind.takes_text() {
        return Err(ConfigErrorKind::UnknownDescriptorKey {
            key: TEXT_KEY.to_string(),
        });
    }
    if caption.is_some() && !kind.takes_caption() {
        return Err(ConfigErrorKind::UnknownDescriptorKey {
            key: CAPTION_KEY.to_string(),
        });
    }

    let text = text.map(parse_boxed).transpose()?;
    let caption = caption.map(parse_boxed).transpose()?;

    let descriptor = match kind {
        DescriptorKind::Image => ContentDescriptor::Image {
            source: scalar(kind, value)?,
            caption,
        },
        DescriptorKind::Link => ContentDescriptor::Hyperlink {
            url: scalar(kind, value)?,
            text,
        },
        DescriptorKind::Email => ContentDescriptor::Email {
            address: scalar(kind, value)?,
            text,
        },
        DescriptorKind::Anchor => ContentDescriptor::Anchor {
            name: scalar(kind, value)?,
            text,
        },
        DescriptorKind::Jump => ContentDescriptor::Jump {
            anchor: scalar(kind, value)?,
            text,
        },
        DescriptorKind::File => ContentDescriptor::FileLink {
            path: scalar(kind, value)?,
            text,
        },
        DescriptorKind::Bold => ContentDescriptor::Bold(parse_boxed(value)?),
        DescriptorKind::Italics => ContentDescriptor::Italics(parse_boxed(value)?),
        DescriptorKind::Underline => ContentDescriptor::Underline(parse_boxed(value)?),
        DescriptorKind::Numbers => ContentDescriptor::NumberedList(list_items(kind, value)?),
        DescriptorKind::Bullets => ContentDescriptor::BulletedList(list_items(kind, value)?),
    };
    Ok(descriptor)
}

fn parse_boxed(node: &Value) -> Result<Box<ContentDescriptor>, ConfigErrorKind> {
    parse_descriptor(node).map(Box::new)
}

fn key_name(key: &Value) -> Result<String, ConfigErrorKind> {
    match key {
        Value::String(name) => Ok(name.clone()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(ConfigErrorKind::InvalidDescriptorValue {
            key: format!("{:?}", key),
            expected: "a plain key name",
        }),
    }
}

/// The text of a single-valued kind key such as a link target or an image source.
pub(crate) fn scalar(kind: DescriptorKind, value: &Value) -> Result<String, ConfigErrorKind> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Tagged(tagged) => scalar(kind, &tagged.value),
        _ => Err(ConfigErrorKind::InvalidDescriptorValue {
            key: kind.key().to_string(),
            expected: "a single value",
        }),
    }
}

fn list_items(
    kind: DescriptorKind,
    value: &Value,
) -> Result<Vec<ContentDescriptor>, ConfigErrorKind> {
    match value {
        Value::Sequence(items) => items.iter().map(parse_descriptor).collect(),
        Value::Tagged(tagged) => list_items(kind, &tagged.value),
        _ => Err(ConfigErrorKind::InvalidDescriptorValue {
            key: kind.key().to_string(),
            expected: "a list",
        }),
    }
}
