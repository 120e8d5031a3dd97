//! Transformations
//!
//!     A transformation is one configured edit aimed at a single identifier: `top`, or the
//!     pre-run title of an article. Applying a batch runs in four steps:
//!
//!     1. model: the specifier group is parsed into a typed [`Transformation`] (done by the
//!        document loader, so a malformed entry only poisons itself).
//!     2. index: identifiers are resolved against a [`TargetIndex`] snapshot taken once,
//!        before anything is mutated.
//!     3. mutator: the new title/body/top content is computed and validated in full, then
//!        written into the tree in one go.
//!     4. orchestrator: entries are processed strictly in document order and each yields a
//!        [`TransformationOutcome`]; a failure never blocks or rolls back another entry.

mod index;
mod model;
mod mutator;
mod orchestrator;

pub use index::{normalize_identifier, Target, TargetIndex};
pub use model::{
    ArticleTransformation, Specifier, TopTransformation, Transformation, TransformationEntry,
    TOP_IDENTIFIER,
};
pub use mutator::{apply_mutation, prepare_mutation, Base, BodyPlan, Mutation};
pub use orchestrator::{apply_transformations, TransformationOutcome};
