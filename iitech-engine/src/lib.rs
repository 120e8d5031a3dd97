//! Transformation engine for the iitech newsletter tool
//!
//!     Given a newsletter template and a YAML document of edits, the engine retitles articles,
//!     grows or replaces their bodies, splits them into two columns and swaps the top image.
//!     It is a pure lib: it never reads files, touches the environment or prints. The CLI owns
//!     all of that, and the HTML side lives behind the [`tree::TemplateTree`] trait so the
//!     engine never parses markup itself.
//!
//! Architecture
//!
//!     .
//!     ├── descriptor          # Content descriptor AST and its YAML parser
//!     ├── document.rs         # Transformation document loader
//!     ├── error.rs
//!     ├── render.rs           # Descriptor → HTML fragment
//!     ├── tree.rs             # The TemplateTree seam
//!     ├── testing.rs          # In-memory TemplateTree
//!     └── transform
//!         ├── model.rs        # Typed transformations and specifier parsing
//!         ├── index.rs        # Identifier → target snapshot
//!         ├── mutator.rs      # Body specifier precedence, prepare/apply
//!         └── orchestrator.rs # Runs a document, one outcome per entry
//!
//!     Data flows one way, document → descriptors → rendered fragments → tree. The tree is
//!     the only mutable state and the orchestrator holds it exclusively for the whole run.
//!
//! Testing
//!
//!     Unit tests live next to the code. Behavior across modules (ordering, the frozen index,
//!     precedence) is covered in tests/ against [`testing::MemoryTree`].

pub mod descriptor;
pub mod document;
pub mod error;
pub mod render;
pub mod testing;
pub mod transform;
pub mod tree;

pub use document::TransformationDocument;
pub use error::{ConfigError, ConfigErrorKind, DocumentError};
pub use render::RenderOptions;
pub use transform::{apply_transformations, TransformationOutcome};
pub use tree::TemplateTree;
