//! Computing and writing region content
//!
//!     Mutation is split in two so a failing transformation never leaves a half-written region:
//!     [`prepare_mutation`] reads the tree, validates the specifiers and renders everything into
//!     a [`Mutation`]; [`apply_mutation`] only writes. Nothing is written unless preparation
//!     succeeded.
//!
//! Body specifier precedence
//!
//!     | left | right | prepend/append/replace | existing body | result                      |
//!     |------|-------|------------------------|---------------|-----------------------------|
//!     | yes  | yes   | ignored                | any           | columns from left and right |
//!     | yes  | no    | any                    | any           | UnpairedColumnSpecifier     |
//!     | no   | yes   | any                    | any           | UnpairedColumnSpecifier     |
//!     | no   | no    | none                   | any           | body untouched              |
//!     | no   | no    | some                   | columns       | ColumnBodyConflict          |
//!     | no   | no    | some                   | paragraphs    | prepend ++ base ++ append   |
//!
//!     where base is `replace` when given and the existing body otherwise.

use super::index::Target;
use super::model::{ArticleTransformation, Specifier, TopTransformation, Transformation};
use crate::descriptor::Paragraph;
use crate::error::{ConfigError, ConfigErrorKind};
use crate::render::{
    join_paragraphs, render_descriptor, render_paragraph, render_paragraphs, RenderOptions,
};
use crate::tree::{ArticleId, ExistingBody, RenderedBody, TemplateTree};

/// What a transformation will write, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Top {
        source: String,
        caption: String,
    },
    Article {
        article: ArticleId,
        title: Option<String>,
        body: Option<RenderedBody>,
    },
}

/// Where the paragraphs of a single-column body come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base<'t> {
    Existing,
    Replace(&'t [Paragraph]),
}

/// The body edit selected by the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPlan<'t> {
    Keep,
    Columns {
        left: &'t [Paragraph],
        right: &'t [Paragraph],
    },
    Paragraphs {
        prepend: &'t [Paragraph],
        base: Base<'t>,
        append: &'t [Paragraph],
    },
}

impl<'t> BodyPlan<'t> {
    /// Select the body edit for a transformation; this is the precedence table above.
    pub fn select(transformation: &'t ArticleTransformation) -> Result<Self, ConfigError> {
        let t = transformation;
        match (t.left.as_deref(), t.right.as_deref()) {
            (Some(left), Some(right)) => Ok(BodyPlan::Columns { left, right }),
            (Some(_), None) => Err(unpaired(Specifier::Left, Specifier::Right)),
            (None, Some(_)) => Err(unpaired(Specifier::Right, Specifier::Left)),
            (None, None) => match (t.prepend.as_deref(), t.replace.as_deref(), t.append.as_deref()) {
                (None, None, None) => Ok(BodyPlan::Keep),
                (prepend, replace, append) => Ok(BodyPlan::Paragraphs {
                    prepend: prepend.unwrap_or_default(),
                    base: replace.map_or(Base::Existing, Base::Replace),
                    append: append.unwrap_or_default(),
                }),
            },
        }
    }
}

fn unpaired(given: Specifier, missing: Specifier) -> ConfigError {
    ConfigError::in_specifier(
        given.key(),
        ConfigErrorKind::UnpairedColumnSpecifier {
            specifier: given.key(),
            missing: missing.key(),
        },
    )
}

/// Validate a transformation against its target and render everything it will write.
pub fn prepare_mutation<T: TemplateTree + ?Sized>(
    tree: &T,
    target: Target,
    transformation: &Transformation,
    options: &RenderOptions,
) -> Result<Mutation, ConfigError> {
    match (target, transformation) {
        (Target::Top, Transformation::Top(top)) => Ok(prepare_top(top, options)),
        (Target::Article(article), Transformation::Article(edit)) => {
            prepare_article(tree, article, edit, options)
        }
        // Only the `top` identifier parses to a top transformation and resolves to the top
        // target, so a mismatch means the caller paired them by hand.
        (Target::Top, Transformation::Article(_)) | (Target::Article(_), Transformation::Top(_)) => {
            Err(ConfigErrorKind::TopSpecifierMisuse {
                key: super::model::TOP_IDENTIFIER.to_string(),
            }
            .into())
        }
    }
}

fn prepare_top(top: &TopTransformation, options: &RenderOptions) -> Mutation {
    Mutation::Top {
        source: options.resolve(&top.image),
        caption: render_descriptor(&top.caption, options),
    }
}

fn prepare_article<T: TemplateTree + ?Sized>(
    tree: &T,
    article: ArticleId,
    edit: &ArticleTransformation,
    options: &RenderOptions,
) -> Result<Mutation, ConfigError> {
    let plan = BodyPlan::select(edit)?;
    let body = match plan {
        BodyPlan::Keep => None,
        BodyPlan::Columns { left, right } => Some(RenderedBody::Columns {
            left: render_paragraphs(left, options),
            right: render_paragraphs(right, options),
        }),
        BodyPlan::Paragraphs {
            prepend,
            base,
            append,
        } => {
            let existing = match tree.article_body(article) {
                ExistingBody::Paragraphs(markup) => markup,
                ExistingBody::Columns => return Err(column_conflict(edit)),
            };
            let base = match base {
                Base::Replace(paragraphs) => render_each(paragraphs, options),
                Base::Existing if existing.trim().is_empty() => Vec::new(),
                Base::Existing => vec![existing],
            };
            let rendered = render_each(prepend, options)
                .into_iter()
                .chain(base)
                .chain(render_each(append, options));
            Some(RenderedBody::Paragraphs(join_paragraphs(rendered)))
        }
    };

    let title = edit
        .title
        .as_ref()
        .map(|title| render_descriptor(title, options));

    Ok(Mutation::Article {
        article,
        title,
        body,
    })
}

fn render_each(paragraphs: &[Paragraph], options: &RenderOptions) -> Vec<String> {
    paragraphs
        .iter()
        .map(|paragraph| render_paragraph(paragraph, options))
        .collect()
}

fn column_conflict(edit: &ArticleTransformation) -> ConfigError {
    let specifier = [
        (Specifier::Prepend, edit.prepend.is_some()),
        (Specifier::Replace, edit.replace.is_some()),
        (Specifier::Append, edit.append.is_some()),
    ]
    .into_iter()
    .find(|(_, present)| *present)
    .map(|(specifier, _)| specifier.key());

    ConfigError {
        specifier: specifier.map(str::to_string),
        kind: ConfigErrorKind::ColumnBodyConflict,
    }
}

/// Write a prepared mutation into the tree.
pub fn apply_mutation<T: TemplateTree + ?Sized>(tree: &mut T, mutation: Mutation) {
    match mutation {
        Mutation::Top { source, caption } => tree.replace_top_image(&source, &caption),
        Mutation::Article {
            article,
            title,
            body,
        } => {
            if let Some(title) = title {
                tree.replace_title(article, &title);
            }
            if let Some(body) = body {
                tree.replace_body(article, body);
            }
        }
    }
}
