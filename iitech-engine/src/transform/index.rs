//! Identifier → target resolution
//!
//!     The index is a snapshot. Titles are read from the tree exactly once, when the index is
//!     built, and stored next to the article handle they came from. Later title rewrites in the
//!     same run are invisible to it: an identifier keeps resolving to the article that carried
//!     that title before the run started.

use super::model::TOP_IDENTIFIER;
use crate::tree::{ArticleId, TemplateTree};
use std::collections::HashMap;

/// A resolved region of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Top,
    Article(ArticleId),
}

#[derive(Debug, Clone, Default)]
pub struct TargetIndex {
    articles: HashMap<String, ArticleId>,
}

impl TargetIndex {
    /// Snapshot the tree's article titles. When several articles share a title, the first one
    /// in document order wins and the others are unreachable by that identifier.
    pub fn build<T: TemplateTree + ?Sized>(tree: &T) -> Self {
        let mut articles = HashMap::new();
        for (article, title) in tree.article_titles() {
            articles
                .entry(normalize_identifier(&title))
                .or_insert(article);
        }
        Self { articles }
    }

    pub fn resolve(&self, identifier: &str) -> Option<Target> {
        let identifier = normalize_identifier(identifier);
        if identifier == TOP_IDENTIFIER {
            return Some(Target::Top);
        }
        self.articles.get(&identifier).copied().map(Target::Article)
    }

    /// Number of distinct article titles in the snapshot.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Collapse runs of whitespace and trim, so hand-wrapped titles match one-line identifiers.
pub fn normalize_identifier(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
