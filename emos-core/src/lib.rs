//! Domain models and the static feature catalog for the EMOS shell.
//!
//! The shell (`emos`) and its demo backend both build on this crate: the
//! shell renders panels from [`catalog::FeatureDefinition`]s and falls back to
//! their local mocks, the backend answers with its own processors but shares
//! the descriptors and the information-unit catalog.

pub mod catalog;
pub mod error;
pub mod models;

pub use error::ProcessingError;
