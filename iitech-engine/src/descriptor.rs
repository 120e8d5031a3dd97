//! Content descriptors
//!
//!     A content descriptor is the recursive unit users write in a transformation document to
//!     describe what should appear on the page: plain text, an image, one of the link flavours,
//!     a style wrapper or a list. The set of kinds is closed, so the AST is a single enum and
//!     every consumer matches on it exhaustively.
//!
//!     The parser turns a YAML node into that AST. A bare scalar is text, a list is a sequence,
//!     and an attribute group names exactly one kind key plus the optional `text`/`caption`:
//!
//!         - "Read the "
//!         - link: https://example.org/report
//!           text: { bold: full report }
//!
//!     Style wrappers take a descriptor as their value, so they nest to any depth.

mod ast;
mod parser;

pub use ast::{ContentDescriptor, DescriptorKind, Paragraph};
pub use parser::{parse_descriptor, parse_paragraphs};
pub(crate) use parser::scalar;
