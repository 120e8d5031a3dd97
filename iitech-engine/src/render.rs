//! Descriptor → HTML rendering
//!
//!     Rendering is a single recursive dispatch over [`ContentDescriptor`], writing into one
//!     output buffer. It is pure: the same descriptor and options always give the same markup.
//!
//! Markup
//!
//!     | Descriptor      | HTML                                                     |
//!     |-----------------|----------------------------------------------------------|
//!     | Text            | escaped text                                             |
//!     | Sequence        | children back to back, no separator                      |
//!     | Image           | centered `<div><img></div>`, or a shrink-wrapped table   |
//!     |                 | with the image above a justified caption                 |
//!     | Hyperlink       | `<a href target="_blank">`                               |
//!     | Email           | `<a href="mailto:…">`                                    |
//!     | Anchor          | `<a name>`                                               |
//!     | Jump            | `<a href="#…">`                                          |
//!     | FileLink        | `<a href target="_blank">` to the resolved location      |
//!     | Bold/Italics/   | `<strong>`, `<em>`, `<u>`                                |
//!     | Underline       |                                                          |
//!     | NumberedList    | `<ol>` of `<li value="n">`                               |
//!     | BulletedList    | `<ul>` of `<li>` with disc markers                       |
//!
//!     Paragraphs are rendered back to back and joined with [`PARAGRAPH_BREAK`].

use crate::descriptor::{ContentDescriptor, Paragraph};
use url::Url;

/// Separator between the paragraphs of a body.
pub const PARAGRAPH_BREAK: &str = "<br><br>";

/// Settings that affect how descriptors become markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Base that relative file paths and image sources are joined onto.
    /// Without one, relative paths are emitted as written.
    pub server_root: Option<Url>,
}

impl RenderOptions {
    pub fn with_server_root(server_root: Url) -> Self {
        Self {
            server_root: Some(server_root),
        }
    }

    /// Resolve a file path or image source to the location the page should link to.
    pub fn resolve(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match &self.server_root {
            Some(root) => root
                .join(path)
                .map(String::from)
                .unwrap_or_else(|_| path.to_string()),
            None => path.to_string(),
        }
    }
}

/// Render one descriptor.
pub fn render_descriptor(descriptor: &ContentDescriptor, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_descriptor(&mut out, descriptor, options);
    out
}

/// Render one paragraph: its descriptors concatenated.
pub fn render_paragraph(paragraph: &Paragraph, options: &RenderOptions) -> String {
    let mut out = String::new();
    for item in &paragraph.items {
        write_descriptor(&mut out, item, options);
    }
    out
}

/// Render a list of paragraphs as one body region.
pub fn render_paragraphs(paragraphs: &[Paragraph], options: &RenderOptions) -> String {
    join_paragraphs(
        paragraphs
            .iter()
            .map(|paragraph| render_paragraph(paragraph, options)),
    )
}

/// Join already-rendered paragraphs with [`PARAGRAPH_BREAK`].
pub fn join_paragraphs<I>(rendered: I) -> String
where
    I: IntoIterator<Item = String>,
{
    rendered
        .into_iter()
        .collect::<Vec<_>>()
        .join(PARAGRAPH_BREAK)
}

fn write_descriptor(out: &mut String, descriptor: &ContentDescriptor, options: &RenderOptions) {
    match descriptor {
        ContentDescriptor::Text(text) => out.push_str(&escape_text(text)),

        ContentDescriptor::Sequence(items) => {
            for item in items {
                write_descriptor(out, item, options);
            }
        }

        ContentDescriptor::Image { source, caption } => {
            let source = escape_text(&options.resolve(source));
            match caption {
                None => {
                    out.push_str(r#"<div style="text-align: center;">"#);
                    out.push_str(&format!(r#"<img src="{}" alt="">"#, source));
                    out.push_str("</div>");
                }
                Some(caption) => {
                    // width: 1px makes the table shrink to the image, so the caption wraps to it
                    out.push_str(r#"<table align="center" style="margin: 0 auto; width: 1px;">"#);
                    out.push_str(r#"<tr><td style="text-align: center;">"#);
                    out.push_str(&format!(r#"<img src="{}" alt="">"#, source));
                    out.push_str("</td></tr>");
                    out.push_str(r#"<tr><td style="text-align: justify;">"#);
                    write_descriptor(out, caption, options);
                    out.push_str("</td></tr></table>");
                }
            }
        }

        ContentDescriptor::Hyperlink { url, text } => write_link(
            out,
            &[("href", url.as_str()), ("target", "_blank")],
            text.as_deref(),
            url,
            options,
        ),

        ContentDescriptor::Email { address, text } => write_link(
            out,
            &[("href", format!("mailto:{}", address).as_str())],
            text.as_deref(),
            address,
            options,
        ),

        ContentDescriptor::Anchor { name, text } => write_link(
            out,
            &[("name", name.as_str())],
            text.as_deref(),
            name,
            options,
        ),

        ContentDescriptor::Jump { anchor, text } => write_link(
            out,
            &[("href", format!("#{}", anchor).as_str())],
            text.as_deref(),
            anchor,
            options,
        ),

        ContentDescriptor::FileLink { path, text } => write_link(
            out,
            &[("href", options.resolve(path).as_str()), ("target", "_blank")],
            text.as_deref(),
            file_base_name(path),
            options,
        ),

        ContentDescriptor::Bold(inner) => write_wrapped(out, "strong", inner, options),
        ContentDescriptor::Italics(inner) => write_wrapped(out, "em", inner, options),
        ContentDescriptor::Underline(inner) => write_wrapped(out, "u", inner, options),

        ContentDescriptor::NumberedList(items) => {
            out.push_str("<ol>");
            for (index, item) in items.iter().enumerate() {
                out.push_str(&format!(r#"<li value="{}">"#, index + 1));
                write_descriptor(out, item, options);
                out.push_str("</li>");
            }
            out.push_str("</ol>");
        }

        ContentDescriptor::BulletedList(items) => {
            out.push_str(r#"<ul style="list-style-type: disc;">"#);
            for item in items {
                out.push_str("<li>");
                write_descriptor(out, item, options);
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
    }
}

fn write_wrapped(
    out: &mut String,
    tag: &str,
    inner: &ContentDescriptor,
    options: &RenderOptions,
) {
    out.push_str(&format!("<{}>", tag));
    write_descriptor(out, inner, options);
    out.push_str(&format!("</{}>", tag));
}

fn write_link(
    out: &mut String,
    attributes: &[(&str, &str)],
    text: Option<&ContentDescriptor>,
    fallback: &str,
    options: &RenderOptions,
) {
    out.push_str("<a");
    for (name, value) in attributes {
        out.push_str(&format!(r#" {}="{}""#, name, escape_text(value)));
    }
    out.push('>');
    match text {
        Some(text) => write_descriptor(out, text, options),
        None => out.push_str(&escape_text(fallback)),
    }
    out.push_str("</a>");
}

/// The last path segment, ignoring any query or fragment.
fn file_base_name(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

/// Escape text for use between tags or inside a double-quoted attribute value.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
