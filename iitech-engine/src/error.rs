//! Error types for descriptor parsing, document loading and body mutation.
//!
//!     Every [`ConfigError`] is scoped to a single transformation: the orchestrator turns it into
//!     an outcome and moves on. Only [`DocumentError`] is fatal, and only to the loader, since it
//!     means there is no transformation list to iterate at all.

use crate::descriptor::DescriptorKind;
use std::fmt;
use thiserror::Error;

/// What went wrong with a single transformation's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigErrorKind {
    /// An attribute group carried more than one kind key.
    #[error("descriptor combines {}; use exactly one kind per group", .kinds.join(" and "))]
    AmbiguousDescriptor { kinds: Vec<String> },

    /// An attribute group carried a key that is not a kind, `text` or `caption`,
    /// or a `text`/`caption` key on a kind that does not take one.
    #[error("unknown descriptor key '{key}'")]
    UnknownDescriptorKey { key: String },

    /// An attribute group with no kind key at all.
    #[error("descriptor does not contain a kind key; choose from {}", kind_keys())]
    MissingDescriptorKind,

    /// A kind key whose value has the wrong shape.
    #[error("'{key}' expects {expected}")]
    InvalidDescriptorValue { key: String, expected: &'static str },

    /// A key appears twice in the same mapping of a specifier group.
    #[error("'{key}' is given more than once")]
    DuplicateKey { key: String },

    /// The value of an identifier is not an attribute group.
    #[error("specifiers must be given as a mapping")]
    InvalidSpecifierGroup,

    /// An article transformation named a specifier that does not exist.
    #[error("unknown specifier '{key}'; choose from title, prepend, append, replace, left, right")]
    UnknownSpecifier { key: String },

    /// Only one half of a two-column layout was given.
    #[error("'{specifier}' requires a matching '{missing}'")]
    UnpairedColumnSpecifier {
        specifier: &'static str,
        missing: &'static str,
    },

    /// prepend/append/replace aimed at a body that is already split into columns.
    #[error("the body is split into columns; use left and right instead")]
    ColumnBodyConflict,

    /// `top` was given a specifier it does not support.
    #[error("'{key}' is not supported on top; only image and caption are")]
    TopSpecifierMisuse { key: String },

    /// `top` is missing one of its two required specifiers.
    #[error("top requires '{key}'")]
    MissingTopSpecifier { key: &'static str },
}

fn kind_keys() -> String {
    DescriptorKind::ALL
        .iter()
        .map(|kind| kind.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A configuration error together with the specifier it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub specifier: Option<String>,
    pub kind: ConfigErrorKind,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind) -> Self {
        Self {
            specifier: None,
            kind,
        }
    }

    pub fn in_specifier(specifier: impl Into<String>, kind: ConfigErrorKind) -> Self {
        Self {
            specifier: Some(specifier.into()),
            kind,
        }
    }
}

impl From<ConfigErrorKind> for ConfigError {
    fn from(kind: ConfigErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            Some(specifier) => write!(f, "in '{}': {}", specifier, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Fatal errors while loading a transformation document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("transformation document must be a mapping or a list of mappings")]
    InvalidShape,

    #[error("identifier must be a plain value, found {found}")]
    InvalidIdentifier { found: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_specifier() {
        let err = ConfigError::in_specifier(
            "append",
            ConfigErrorKind::UnknownDescriptorKey {
                key: "blod".to_string(),
            },
        );
        assert_eq!(err.to_string(), "in 'append': unknown descriptor key 'blod'");
    }

    #[test]
    fn missing_kind_lists_choices() {
        let message = ConfigErrorKind::MissingDescriptorKind.to_string();
        assert!(message.contains("image"));
        assert!(message.ends_with("choose from image, link, email, anchor, jump, file, bold, italics, underline, numbers, bullets"));
    }
}
