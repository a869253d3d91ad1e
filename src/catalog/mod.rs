//! Catalog Store subsystem for curio
//!
//! Immutable course, lesson and achievement definitions, loaded once at
//! startup and shared read-only by every other subsystem.
//!
//! # Design Principles
//!
//! - Configuration, not data: definitions never change after `build`
//! - Integrity checked up front (ordinals, thresholds, references, cycles)
//! - Unknown identifiers are NOT FOUND; broken catalogs are FATAL
//! - Deterministic iteration: every collection is ordered by id or ordinal

mod errors;
mod loader;
mod store;
mod types;
mod validator;

pub use errors::{CatalogError, CatalogErrorCode, CatalogResult};
pub use loader::CatalogLoader;
pub use store::Catalog;
pub use types::{
    Achievement, CatalogDocument, Course, CourseDef, CourseMetadata, Lesson, LessonDef, Rarity,
    UnlockRule,
};
pub use validator::{plan_evaluation, EvaluationPlan};
