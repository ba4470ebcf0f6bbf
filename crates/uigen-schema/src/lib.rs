//! uigen Schema Registry
//!
//! Immutable, process-wide description of everything the generator can
//! produce.
//!
//! # Core Concepts
//!
//! - [`ArtifactKind`]: tag selecting schema, validator and prompt template
//! - [`ConfigSchema`]: declarative shape of a component configuration
//! - [`schema_for`] / [`describe`]: registry lookups used by prompts and validators
//! - [`Provider`]: external UI library targeted by code generation
//!
//! # Example
//!
//! ```rust
//! use uigen_schema::{describe, schema_for, ArtifactKind};
//!
//! let schema = schema_for(ArtifactKind::Progress).unwrap();
//! assert!(schema.field("value").is_some());
//!
//! let text = describe(ArtifactKind::Progress).unwrap();
//! assert!(text.contains("Omit a field to leave it unchanged"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod field;
mod kind;
mod provider;
mod registry;

pub use error::SchemaError;
pub use field::{ConfigSchema, CrossFieldRule, FieldSpec, FieldType, COLOR_FORMAT};
pub use kind::ArtifactKind;
pub use provider::{Provider, ProviderCapabilities};
pub use registry::{config_kinds, describe, schema_for};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
