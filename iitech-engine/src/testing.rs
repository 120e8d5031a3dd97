//! In-memory template tree
//!
//!     [`MemoryTree`] implements [`TemplateTree`] over plain strings so engine behavior can be
//!     exercised without an HTML parser. Title markup is stored as written; `article_titles`
//!     returns it verbatim, which is enough for tests that use plain-text titles.

use crate::tree::{ArticleId, ExistingBody, RenderedBody, TemplateTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryArticle {
    pub title: String,
    pub body: RenderedBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    pub top_image: String,
    pub top_caption: String,
    pub articles: Vec<MemoryArticle>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an article with a single-region body.
    pub fn with_article(mut self, title: &str, body: &str) -> Self {
        self.articles.push(MemoryArticle {
            title: title.to_string(),
            body: RenderedBody::Paragraphs(body.to_string()),
        });
        self
    }

    /// Add an article whose body is already split into columns.
    pub fn with_column_article(mut self, title: &str, left: &str, right: &str) -> Self {
        self.articles.push(MemoryArticle {
            title: title.to_string(),
            body: RenderedBody::Columns {
                left: left.to_string(),
                right: right.to_string(),
            },
        });
        self
    }

    pub fn article(&self, index: usize) -> &MemoryArticle {
        &self.articles[index]
    }

    /// The body of a single-region article; panics on a column body.
    pub fn body(&self, index: usize) -> &str {
        match &self.articles[index].body {
            RenderedBody::Paragraphs(markup) => markup,
            RenderedBody::Columns { .. } => panic!("article {} has a column body", index),
        }
    }
}

impl TemplateTree for MemoryTree {
    fn article_titles(&self) -> Vec<(ArticleId, String)> {
        self.articles
            .iter()
            .enumerate()
            .map(|(index, article)| (ArticleId::new(index), article.title.clone()))
            .collect()
    }

    fn article_body(&self, article: ArticleId) -> ExistingBody {
        match &self.articles[article.index()].body {
            RenderedBody::Paragraphs(markup) => ExistingBody::Paragraphs(markup.clone()),
            RenderedBody::Columns { .. } => ExistingBody::Columns,
        }
    }

    fn replace_title(&mut self, article: ArticleId, markup: &str) {
        if let Some(article) = self.articles.get_mut(article.index()) {
            article.title = markup.to_string();
        }
    }

    fn replace_body(&mut self, article: ArticleId, body: RenderedBody) {
        if let Some(article) = self.articles.get_mut(article.index()) {
            article.body = body;
        }
    }

    fn replace_top_image(&mut self, source: &str, caption_markup: &str) {
        self.top_image = source.to_string();
        self.top_caption = caption_markup.to_string();
    }
}
