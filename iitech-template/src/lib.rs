//! HTML adapter for the iitech newsletter template
//!
//!     Parses a newsletter page with html5ever into an `RcDom` and exposes it to the engine
//!     as a [`iitech_engine::tree::TemplateTree`]. Regions are found by CSS class, see
//!     [`TemplateLayout`]; the default classes match the stock template.
//!
//!     .
//!     ├── document.rs   # TemplateDocument: region lookup and the TemplateTree impl
//!     ├── dom.rs        # rcdom helpers: search, text, fragment splicing, serialization
//!     ├── error.rs
//!     ├── layout.rs     # Region class names
//!     └── review.rs     # Offline link review
//!
//!     Rendered fragments coming from the engine are parsed in the context of the element
//!     they replace before they are spliced in, so whatever html5ever would do to them in a
//!     real page is what ends up in the tree.

mod dom;
pub mod document;
pub mod error;
pub mod layout;
pub mod review;

pub use document::TemplateDocument;
pub use error::TemplateError;
pub use layout::TemplateLayout;
pub use review::ReviewReport;
