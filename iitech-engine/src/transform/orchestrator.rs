//! Running a transformation list against a template tree
//!
//!     Each entry moves through `parsed → resolved → applied`, or stops early as unresolved or
//!     failed. Entries are independent: a failure is recorded as that entry's outcome and the
//!     run continues with the next one. The target index is built once, before the first entry,
//!     so every identifier is matched against the titles the template started with while every
//!     mutation still sees the effect of the ones before it.

use super::index::TargetIndex;
use super::model::TransformationEntry;
use super::mutator::{apply_mutation, prepare_mutation};
use crate::error::ConfigError;
use crate::render::RenderOptions;
use crate::tree::TemplateTree;
use serde::{Serialize, Serializer};

/// What happened to one entry of the transformation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransformationOutcome {
    Applied {
        identifier: String,
    },
    TargetNotFound {
        identifier: String,
    },
    ConfigurationError {
        identifier: String,
        #[serde(serialize_with = "serialize_display")]
        error: ConfigError,
    },
}

impl TransformationOutcome {
    pub fn identifier(&self) -> &str {
        match self {
            TransformationOutcome::Applied { identifier }
            | TransformationOutcome::TargetNotFound { identifier }
            | TransformationOutcome::ConfigurationError { identifier, .. } => identifier,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, TransformationOutcome::Applied { .. })
    }
}

fn serialize_display<S: Serializer>(error: &ConfigError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Apply every entry in document order and return one outcome per entry, in the same order.
pub fn apply_transformations<T: TemplateTree + ?Sized>(
    tree: &mut T,
    entries: &[TransformationEntry],
    options: &RenderOptions,
) -> Vec<TransformationOutcome> {
    let index = TargetIndex::build(tree);
    tracing::debug!(articles = index.len(), entries = entries.len(), "built target index");

    entries
        .iter()
        .map(|entry| apply_entry(tree, &index, entry, options))
        .collect()
}

fn apply_entry<T: TemplateTree + ?Sized>(
    tree: &mut T,
    index: &TargetIndex,
    entry: &TransformationEntry,
    options: &RenderOptions,
) -> TransformationOutcome {
    let identifier = entry.identifier.clone();

    let transformation = match &entry.parsed {
        Ok(transformation) => transformation,
        Err(error) => {
            tracing::warn!(identifier = %identifier, %error, "skipping unparsable transformation");
            return TransformationOutcome::ConfigurationError {
                identifier,
                error: error.clone(),
            };
        }
    };

    let Some(target) = index.resolve(&identifier) else {
        tracing::warn!(identifier = %identifier, "no article matches identifier");
        return TransformationOutcome::TargetNotFound { identifier };
    };

    match prepare_mutation(tree, target, transformation, options) {
        Ok(mutation) => {
            tracing::debug!(identifier = %identifier, ?target, "applying transformation");
            apply_mutation(tree, mutation);
            TransformationOutcome::Applied { identifier }
        }
        Err(error) => {
            tracing::warn!(identifier = %identifier, %error, "transformation rejected");
            TransformationOutcome::ConfigurationError { identifier, error }
        }
    }
}
