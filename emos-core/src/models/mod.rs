//! Domain models for EMOS.
//!
//! # Core Concepts
//!
//! ## Static configuration
//!
//! - [`FeatureDescriptor`]: identity of one of the sixteen feature panels.
//! - [`FeatureModuleRef`]: where the implementation backing a feature lives.
//! - [`InputField`] / [`OutputField`]: the field specs a panel is rendered from.
//! - [`InformationUnit`]: a database, generator or predictor the user can
//!   select alongside a feature run.
//!
//! ## Per-run values
//!
//! - [`PanelInputs`]: the flat mapping of input values sent with a run.
//! - [`ProcessingResult`]: fields or an error marker, owned by the open panel.
//! - [`ProcessResponse`]: what the backend answers, with optional [`LogLine`]s.

mod feature;
mod field;
mod inputs;
mod result;
mod unit;

pub use feature::*;
pub use field::*;
pub use inputs::*;
pub use result::*;
pub use unit::*;
