//! uigen Validation Layer
//!
//! The trusted boundary between raw generator output and values the
//! orchestrator is allowed to return.
//!
//! # Core Operations
//!
//! - **Extract**: recover a JSON object from free-form text
//! - **Merge**: overlay a candidate onto the current state
//! - **Validate**: check a config value against its kind's schema
//! - **Check**: parse generated TSX and enforce provider vocabularies
//!
//! # Architecture
//!
//! ```text
//! raw text → extract → merge(current, candidate) → ValidatorSet[kind] → ValidationOutcome
//! raw text → extract_sources → SyntaxValidator (per provider) → ValidationOutcome
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod extract;
pub mod merge;
pub mod outcome;
pub mod syntax;

pub use config::{SchemaValidator, Validator, ValidatorSet};
pub use error::ExtractError;
pub use extract::{extract, extract_component_source, extract_provider_sources, json_type, COMPONENT_SOURCE_KEY};
pub use merge::merge_patch;
pub use outcome::{FieldError, ValidationOutcome};
pub use syntax::SyntaxValidator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the validation layer
    pub use crate::config::{Validator, ValidatorSet};
    pub use crate::extract::{extract, extract_provider_sources};
    pub use crate::outcome::{FieldError, ValidationOutcome};
    pub use crate::syntax::SyntaxValidator;
    pub use uigen_schema::{ArtifactKind, Provider};
}
