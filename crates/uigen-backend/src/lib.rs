//! uigen Backend - hosted text generation over HTTP
//!
//! Implements [`uigen_core::GenerationBackend`] for `generateContent`-style
//! APIs. The client is built once from [`uigen_core::BackendConfig`] and
//! shared read-only between requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use uigen_backend::GeminiBackend;
//! use uigen_core::{BackendConfig, Orchestrator};
//!
//! let backend = GeminiBackend::from_env(&BackendConfig::default())?;
//! let orchestrator = Orchestrator::new(Arc::new(backend));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod gemini;

pub use gemini::GeminiBackend;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
