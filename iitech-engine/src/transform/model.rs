//! Typed transformations and their parsing from specifier groups

use crate::descriptor::{
    parse_descriptor, parse_paragraphs, scalar, ContentDescriptor, DescriptorKind, Paragraph,
};
use crate::error::{ConfigError, ConfigErrorKind};
use crate::transform::index::normalize_identifier;
use serde_yaml::{Mapping, Value};

/// The identifier reserved for the singleton top image.
pub const TOP_IDENTIFIER: &str = "top";

const IMAGE_KEY: &str = "image";
const CAPTION_KEY: &str = "caption";

/// The specifiers an article transformation may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specifier {
    Title,
    Prepend,
    Append,
    Replace,
    Left,
    Right,
}

impl Specifier {
    pub const ALL: [Specifier; 6] = [
        Specifier::Title,
        Specifier::Prepend,
        Specifier::Append,
        Specifier::Replace,
        Specifier::Left,
        Specifier::Right,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Specifier::Title => "title",
            Specifier::Prepend => "prepend",
            Specifier::Append => "append",
            Specifier::Replace => "replace",
            Specifier::Left => "left",
            Specifier::Right => "right",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|specifier| specifier.key() == key)
    }
}

/// New image and caption for the top of the newsletter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopTransformation {
    pub image: String,
    pub caption: ContentDescriptor,
}

/// Edits to one article. Every field is optional; an empty transformation is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleTransformation {
    pub title: Option<ContentDescriptor>,
    pub prepend: Option<Vec<Paragraph>>,
    pub append: Option<Vec<Paragraph>>,
    pub replace: Option<Vec<Paragraph>>,
    pub left: Option<Vec<Paragraph>>,
    pub right: Option<Vec<Paragraph>>,
}

impl ArticleTransformation {
    fn set(&mut self, specifier: Specifier, value: &Value) -> Result<(), ConfigErrorKind> {
        match specifier {
            Specifier::Title => self.title = Some(parse_descriptor(value)?),
            Specifier::Prepend => self.prepend = Some(parse_paragraphs(value)?),
            Specifier::Append => self.append = Some(parse_paragraphs(value)?),
            Specifier::Replace => self.replace = Some(parse_paragraphs(value)?),
            Specifier::Left => self.left = Some(parse_paragraphs(value)?),
            Specifier::Right => self.right = Some(parse_paragraphs(value)?),
        }
        Ok(())
    }
}

/// A parsed transformation. `top` takes an image and caption directly; everything else is
/// an article edit expressed through specifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    Top(TopTransformation),
    Article(ArticleTransformation),
}

impl Transformation {
    /// Parse the specifier group found under `identifier`.
    pub fn parse(identifier: &str, group: &Value) -> Result<Self, ConfigError> {
        let group = as_group(group)?;
        if normalize_identifier(identifier) == TOP_IDENTIFIER {
            parse_top(group).map(Transformation::Top)
        } else {
            parse_article(group).map(Transformation::Article)
        }
    }
}

/// One entry of a transformation document: the identifier it was written under and either
/// the parsed transformation or the reason it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationEntry {
    pub identifier: String,
    pub parsed: Result<Transformation, ConfigError>,
}

impl TransformationEntry {
    pub fn parse(identifier: impl Into<String>, group: &Value) -> Self {
        let identifier = identifier.into();
        let parsed = Transformation::parse(&identifier, group);
        Self { identifier, parsed }
    }
}

fn as_group(value: &Value) -> Result<&Mapping, ConfigError> {
    match value {
        Value::Mapping(group) => Ok(group),
        Value::Tagged(tagged) => as_group(&tagged.value),
        _ => Err(ConfigErrorKind::InvalidSpecifierGroup.into()),
    }
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(name) => name.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

fn parse_top(group: &Mapping) -> Result<TopTransformation, ConfigError> {
    let mut image = None;
    let mut caption = None;

    for (key, value) in group {
        let key = key_text(key);
        match key.as_str() {
            IMAGE_KEY => image = Some(value),
            CAPTION_KEY => caption = Some(value),
            _ => return Err(ConfigErrorKind::TopSpecifierMisuse { key }.into()),
        }
    }

    let image = image.ok_or(ConfigErrorKind::MissingTopSpecifier { key: IMAGE_KEY })?;
    let caption = caption.ok_or(ConfigErrorKind::MissingTopSpecifier { key: CAPTION_KEY })?;

    let image = scalar(DescriptorKind::Image, image)
        .map_err(|kind| ConfigError::in_specifier(IMAGE_KEY, kind))?;
    let caption =
        parse_descriptor(caption).map_err(|kind| ConfigError::in_specifier(CAPTION_KEY, kind))?;

    Ok(TopTransformation { image, caption })
}

fn parse_article(group: &Mapping) -> Result<ArticleTransformation, ConfigError> {
    let mut transformation = ArticleTransformation::default();
    for (key, value) in group {
        let key = key_text(key);
        let specifier = Specifier::from_key(&key).ok_or_else(|| {
            ConfigError::from(ConfigErrorKind::UnknownSpecifier { key: key.clone() })
        })?;
        transformation
            .set(specifier, value)
            .map_err(|kind| ConfigError::in_specifier(specifier.key(), kind))?;
    }
    Ok(transformation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(identifier: &str, source: &str) -> Result<Transformation, ConfigError> {
        let group: Value = serde_yaml::from_str(source).expect("test YAML to parse");
        Transformation::parse(identifier, &group)
    }

    #[test]
    fn article_specifiers_are_parsed() {
        let parsed = parse("News", "{title: Fresh, append: [one, two]}").unwrap();
        let Transformation::Article(article) = parsed else {
            panic!("expected an article transformation");
        };
        assert_eq!(article.title, Some(ContentDescriptor::text("Fresh")));
        assert_eq!(
            article.append,
            Some(vec![Paragraph::from("one"), Paragraph::from("two")])
        );
        assert!(article.prepend.is_none());
    }

    #[test]
    fn top_takes_image_and_caption() {
        let parsed = parse("top", "{image: banner.jpg, caption: {italics: Eid}}").unwrap();
        assert_eq!(
            parsed,
            Transformation::Top(TopTransformation {
                image: "banner.jpg".to_string(),
                caption: ContentDescriptor::italics("Eid".into()),
            })
        );
    }

    #[test]
    fn top_image_accepts_any_scalar() {
        let parsed = parse("top", "{image: 2019, caption: c}").unwrap();
        let Transformation::Top(top) = parsed else {
            panic!("expected a top transformation");
        };
        assert_eq!(top.image, "2019");
    }

    #[test]
    fn top_image_must_be_a_single_value() {
        let err = parse("top", "{image: [a.jpg, b.jpg], caption: c}").unwrap_err();
        assert_eq!(err.specifier.as_deref(), Some("image"));
        assert!(matches!(
            err.kind,
            ConfigErrorKind::InvalidDescriptorValue { .. }
        ));
    }

    #[test]
    fn top_rejects_article_specifiers() {
        let err = parse("top", "{image: a.jpg, caption: c, append: x}").unwrap_err();
        assert_eq!(
            err.kind,
            ConfigErrorKind::TopSpecifierMisuse {
                key: "append".to_string()
            }
        );
    }

    #[test]
    fn top_requires_caption() {
        let err = parse("top", "{image: a.jpg}").unwrap_err();
        assert_eq!(
            err.kind,
            ConfigErrorKind::MissingTopSpecifier { key: "caption" }
        );
    }

    #[test]
    fn unknown_specifier_is_rejected() {
        let err = parse("News", "{prepand: oops}").unwrap_err();
        assert_eq!(
            err.kind,
            ConfigErrorKind::UnknownSpecifier {
                key: "prepand".to_string()
            }
        );
    }

    #[test]
    fn descriptor_errors_carry_their_specifier() {
        let err = parse("News", "{replace: {bold: a, italics: b}}").unwrap_err();
        assert_eq!(err.specifier.as_deref(), Some("replace"));
        assert!(matches!(
            err.kind,
            ConfigErrorKind::AmbiguousDescriptor { .. }
        ));
    }

    #[test]
    fn group_must_be_a_mapping() {
        let err = parse("News", "[a, b]").unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvalidSpecifierGroup);
    }

    #[test]
    fn empty_group_is_a_no_op() {
        let parsed = parse("News", "{}").unwrap();
        assert_eq!(
            parsed,
            Transformation::Article(ArticleTransformation::default())
        );
    }
}
