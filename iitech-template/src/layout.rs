//! CSS classes that mark the editable regions of a template

use serde::Deserialize;

/// Class names the adapter looks for. Every field names a single class; an element matches
/// when its `class` attribute lists that class among others.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    /// Container of one article; holds exactly one title and one body.
    pub article: String,
    pub title: String,
    pub body: String,
    /// Table inside a body that splits it into two columns.
    pub column_table: String,
    pub column_cell: String,
    /// The `<img>` of the top banner, or an element wrapping it.
    pub top_image: String,
    pub top_caption: String,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            article: "article".to_string(),
            title: "article-title".to_string(),
            body: "article-body".to_string(),
            column_table: "article-columns".to_string(),
            column_cell: "article-column".to_string(),
            top_image: "top-image".to_string(),
            top_caption: "top-caption".to_string(),
        }
    }
}
