//! uigen Core - generation orchestration
//!
//! Turns a natural-language intent plus the current state of a UI artifact
//! into a value that is guaranteed to pass validation:
//! - Builds deterministic prompts from schema, state and prior feedback
//! - Calls an opaque text-generation backend
//! - Extracts and validates the response
//! - Feeds every failure back into the next attempt, up to a fixed ceiling
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use uigen_core::{GenerationResult, Orchestrator};
//!
//! # async fn example(backend: Arc<dyn uigen_core::GenerationBackend>) -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(backend);
//! let current = serde_json::json!({"value": 10, "max": 100});
//! let result = orchestrator
//!     .generate_config("progress", "make the bar green", &current)
//!     .await?;
//!
//! if let GenerationResult::Success { value, attempts_used } = result {
//!     println!("{value} after {attempts_used} attempt(s)");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;
mod plan;
pub mod prompt;
pub mod request;

pub use backend::{BackendError, GenerationBackend};
pub use config::{BackendConfig, ConfigError, GenerationConfig, HistoryConfig, UigenConfig};
pub use error::{AttemptError, GenerationError};
pub use history::{HistoryError, HistoryRecord, InMemoryHistory, JsonlHistory, PromptHistory};
pub use orchestrator::Orchestrator;
pub use prompt::{build_component_prompt, build_config_prompt, build_playground_prompt};
pub use request::{GenerationAttempt, GenerationReport, GenerationRequest, GenerationResult};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with uigen Core
    pub use crate::{
        GenerationBackend, GenerationConfig, GenerationRequest, GenerationResult, Orchestrator,
        UigenConfig,
    };
    pub use uigen_schema::{ArtifactKind, Provider};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
