//! The template tree seam
//!
//!     The engine never touches HTML directly. It sees the newsletter through [`TemplateTree`]:
//!     an ordered list of articles (a title and a body each) plus the singleton top image.
//!     Regions are read and written as markup strings; implementations own parsing those
//!     strings into their node representation.
//!
//!     Article handles are positions in the tree's article list as it was when the tree was
//!     built. They stay valid for the tree's whole lifetime because the engine only ever
//!     replaces region contents, never adds or removes articles.

/// Stable handle to an article region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId(usize);

impl ArticleId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// The current shape of an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistingBody {
    /// A single paragraph region, given as its inner markup.
    Paragraphs(String),
    /// A body already split into left and right columns.
    Columns,
}

/// New content for an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    Paragraphs(String),
    Columns { left: String, right: String },
}

/// A mutable view of the newsletter template.
pub trait TemplateTree {
    /// Every article with its current title text, in document order.
    fn article_titles(&self) -> Vec<(ArticleId, String)>;

    /// The current body of an article. Handles must come from [`Self::article_titles`];
    /// implementations may panic on a handle they never issued.
    fn article_body(&self, article: ArticleId) -> ExistingBody;

    /// Overwrite an article's title region with rendered markup.
    fn replace_title(&mut self, article: ArticleId, markup: &str);

    /// Overwrite an article's body region.
    fn replace_body(&mut self, article: ArticleId, body: RenderedBody);

    /// Overwrite the top image source and its caption markup.
    fn replace_top_image(&mut self, source: &str, caption_markup: &str);
}
