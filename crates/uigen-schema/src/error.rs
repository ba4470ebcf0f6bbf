//! Error types for registry lookups

/// Registry lookup failures
///
/// Both variants are caller errors: they are raised before any generation
/// work starts and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Tag does not name a kind, or the kind has no config schema
    #[error("unsupported artifact kind: '{0}'")]
    UnsupportedArtifactKind(String),

    /// Tag does not name a known component library
    #[error("unsupported provider: '{0}'")]
    UnsupportedProvider(String),
}
