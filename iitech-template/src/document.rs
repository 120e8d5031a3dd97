//! A parsed newsletter template
//!
//!     Region lookup happens once, at parse time: the adapter records a handle to each
//!     article's title and body element and to the top image and caption. Mutations replace
//!     the children of those elements (or the `src` of the top image). A `<p>` region that
//!     receives block content is swapped for a `<div>`, since the page would not parse back
//!     otherwise; the stored handle is updated to the new element when that happens.

use crate::dom;
use crate::error::TemplateError;
use crate::layout::TemplateLayout;
use crate::review::{review_links, ReviewReport};
use iitech_engine::tree::{ArticleId, ExistingBody, RenderedBody, TemplateTree};
use markup5ever_rcdom::{Handle, RcDom};
use std::fmt;

struct ArticleRegion {
    title: Handle,
    body: Handle,
}

pub struct TemplateDocument {
    dom: RcDom,
    layout: TemplateLayout,
    articles: Vec<ArticleRegion>,
    top_image: Handle,
    top_caption: Handle,
}

impl TemplateDocument {
    pub fn parse(html: &str, layout: &TemplateLayout) -> Result<Self, TemplateError> {
        let dom = dom::parse(html);
        let nodes = dom::descendants(&dom.document);

        let top_image = nodes
            .iter()
            .find(|node| dom::has_class(node, &layout.top_image))
            .and_then(|marked| {
                if dom::is_element(marked, "img") {
                    Some(marked.clone())
                } else {
                    dom::find_descendant(marked, |node| dom::is_element(node, "img"))
                }
            })
            .ok_or_else(|| TemplateError::MissingTopImage {
                class: layout.top_image.clone(),
            })?;

        let top_caption = nodes
            .iter()
            .find(|node| dom::has_class(node, &layout.top_caption))
            .cloned()
            .ok_or_else(|| TemplateError::MissingTopCaption {
                class: layout.top_caption.clone(),
            })?;

        let articles = nodes
            .iter()
            .filter(|node| dom::has_class(node, &layout.article))
            .enumerate()
            .filter_map(|(position, container)| {
                let title = dom::find_descendant(container, |n| dom::has_class(n, &layout.title));
                let body = dom::find_descendant(container, |n| dom::has_class(n, &layout.body));
                match (title, body) {
                    (Some(title), Some(body)) => Some(ArticleRegion { title, body }),
                    (title, _) => {
                        tracing::warn!(
                            position,
                            missing = if title.is_none() { "title" } else { "body" },
                            "skipping article container without a title or body"
                        );
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(articles = articles.len(), "parsed template");

        Ok(Self {
            dom,
            layout: layout.clone(),
            articles,
            top_image,
            top_caption,
        })
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// Normalize every outbound link on the page, see [`crate::review`].
    pub fn review(&mut self) -> ReviewReport {
        let report = review_links(&self.dom.document);
        tracing::debug!(?report, "reviewed links");
        report
    }

    /// Serialize the whole page, doctype included.
    pub fn to_html(&self) -> Result<String, TemplateError> {
        dom::inner_html(&self.dom.document)
    }

    fn column_markup(&self, left: &str, right: &str) -> String {
        let cell = &self.layout.column_cell;
        format!(
            r#"<table class="{}" width="100%"><tr><td class="{}" width="50%" valign="top">{}</td><td class="{}" width="50%" valign="top">{}</td></tr></table>"#,
            self.layout.column_table, cell, left, cell, right
        )
    }
}

impl fmt::Debug for TemplateDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateDocument")
            .field("layout", &self.layout)
            .field("articles", &self.articles.len())
            .finish_non_exhaustive()
    }
}

impl TemplateTree for TemplateDocument {
    fn article_titles(&self) -> Vec<(ArticleId, String)> {
        self.articles
            .iter()
            .enumerate()
            .map(|(index, article)| {
                let title = dom::text_content(&article.title);
                (ArticleId::new(index), iitech_engine::transform::normalize_identifier(&title))
            })
            .collect()
    }

    fn article_body(&self, article: ArticleId) -> ExistingBody {
        let body = &self.articles[article.index()].body;
        let is_columns = dom::find_descendant(body, |node| {
            dom::has_class(node, &self.layout.column_table)
        })
        .is_some();
        if is_columns {
            return ExistingBody::Columns;
        }
        // Serializing into a Vec never hits an I/O error.
        let markup = dom::inner_html(body).unwrap_or_default();
        ExistingBody::Paragraphs(markup.trim().to_string())
    }

    fn replace_title(&mut self, article: ArticleId, markup: &str) {
        if let Some(article) = self.articles.get_mut(article.index()) {
            article.title = dom::replace_children(&article.title, markup);
        }
    }

    fn replace_body(&mut self, article: ArticleId, body: RenderedBody) {
        let markup = match body {
            RenderedBody::Paragraphs(markup) => markup,
            RenderedBody::Columns { left, right } => self.column_markup(&left, &right),
        };
        if let Some(region) = self.articles.get_mut(article.index()) {
            region.body = dom::replace_children(&region.body, &markup);
        }
    }

    fn replace_top_image(&mut self, source: &str, caption_markup: &str) {
        dom::set_attribute(&self.top_image, "src", source);
        self.top_caption = dom::replace_children(&self.top_caption, caption_markup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Insight</title></head><body>
<img class="top-image" src="old.jpg">
<p class="top-caption">Old caption</p>
<div class="article">
  <h2 class="article-title">Jamati
      News</h2>
  <div class="article-body">First.<br><br>Second.</div>
</div>
<div class="article"><h2 class="article-title">Orphan</h2></div>
<div class="article">
  <h2 class="article-title">Sports</h2>
  <div class="article-body"><table class="article-columns"><tr><td>l</td><td>r</td></tr></table></div>
</div>
</body></html>"#;

    fn document() -> TemplateDocument {
        TemplateDocument::parse(PAGE, &TemplateLayout::default()).expect("template to parse")
    }

    #[test]
    fn incomplete_articles_are_skipped() {
        let doc = document();
        assert_eq!(doc.article_count(), 2);
    }

    #[test]
    fn titles_are_whitespace_normalized() {
        let titles: Vec<_> = document()
            .article_titles()
            .into_iter()
            .map(|(_, title)| title)
            .collect();
        assert_eq!(titles, ["Jamati News", "Sports"]);
    }

    #[test]
    fn bodies_report_their_shape() {
        let doc = document();
        assert_eq!(
            doc.article_body(ArticleId::new(0)),
            ExistingBody::Paragraphs("First.<br><br>Second.".to_string())
        );
        assert_eq!(doc.article_body(ArticleId::new(1)), ExistingBody::Columns);
    }

    #[test]
    fn written_columns_read_back_as_columns() {
        let mut doc = document();
        doc.replace_body(
            ArticleId::new(0),
            RenderedBody::Columns {
                left: "L".to_string(),
                right: "R".to_string(),
            },
        );
        assert_eq!(doc.article_body(ArticleId::new(0)), ExistingBody::Columns);
    }

    #[test]
    fn top_image_is_replaced_in_place() {
        let mut doc = document();
        doc.replace_top_image("new.jpg", "<em>New</em>");
        let html = doc.to_html().unwrap();
        assert!(html.contains(r#"<img class="top-image" src="new.jpg">"#));
        assert!(html.contains(r#"<p class="top-caption"><em>New</em></p>"#));
    }

    const PARAGRAPH_REGIONS: &str = r#"<img class="top-image" src="a.jpg"><p class="top-caption">c</p>
<div class="article"><h2 class="article-title">News</h2><p class="article-body">Old.</p></div>"#;

    #[test]
    fn block_content_in_paragraph_regions_survives_a_reparse() {
        let mut doc = TemplateDocument::parse(PARAGRAPH_REGIONS, &TemplateLayout::default()).unwrap();
        doc.replace_top_image("b.jpg", "<ul><li>one</li><li>two</li></ul>");
        doc.replace_body(
            ArticleId::new(0),
            RenderedBody::Paragraphs(
                r#"Old.<br><br><div style="text-align: center;"><img src="x.jpg" alt=""></div>"#
                    .to_string(),
            ),
        );
        let html = doc.to_html().unwrap();

        let reparsed = TemplateDocument::parse(&html, &TemplateLayout::default()).unwrap();
        assert_eq!(reparsed.to_html().unwrap(), html);
        assert!(html.contains(r#"<div class="top-caption"><ul><li>one</li><li>two</li></ul></div>"#));
        let ExistingBody::Paragraphs(body) = reparsed.article_body(ArticleId::new(0)) else {
            panic!("expected a paragraph body");
        };
        assert!(body.ends_with(r#"<div style="text-align: center;"><img src="x.jpg" alt=""></div>"#));
    }

    #[test]
    fn rewritten_regions_keep_receiving_writes() {
        let mut doc = TemplateDocument::parse(PARAGRAPH_REGIONS, &TemplateLayout::default()).unwrap();
        doc.replace_body(
            ArticleId::new(0),
            RenderedBody::Paragraphs("<ol><li>x</li></ol>".to_string()),
        );
        doc.replace_body(ArticleId::new(0), RenderedBody::Paragraphs("Again.".to_string()));
        assert_eq!(
            doc.article_body(ArticleId::new(0)),
            ExistingBody::Paragraphs("Again.".to_string())
        );
        assert!(doc.to_html().unwrap().contains(r#"<div class="article-body">Again.</div>"#));
    }

    #[test]
    fn missing_top_caption_is_an_error() {
        let result = TemplateDocument::parse(
            r#"<img class="top-image" src="a.jpg">"#,
            &TemplateLayout::default(),
        );
        assert!(matches!(
            result,
            Err(TemplateError::MissingTopCaption { .. })
        ));
    }

    #[test]
    fn top_image_class_may_sit_on_a_wrapper() {
        let doc = TemplateDocument::parse(
            r#"<div class="top-image"><img src="a.jpg"></div><p class="top-caption">c</p>"#,
            &TemplateLayout::default(),
        );
        assert!(doc.is_ok());
    }
}
