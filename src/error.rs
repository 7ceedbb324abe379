//! Error types for annotation tree operations.

use thiserror::Error;

/// Errors that can occur while building a definition index or resolving
/// references.
#[derive(Debug, Error)]
pub enum MivotError {
    /// A REFERENCE node carries no `dmref` attribute, meaning it is a
    /// dynamic (key-based) reference.
    #[error("dynamic reference (no dmref) is not supported")]
    UnsupportedReference,

    /// A `dmref` identifier was found in neither the global namespace nor
    /// the table-scoped namespace.
    #[error("cannot resolve reference dmref={0}")]
    UnresolvedReference(String),

    /// A definition chain references itself, directly or through
    /// intermediate definitions.
    #[error("circular reference chain through dmref={0}")]
    CircularReference(String),

    /// Two definitions declare the same `dmid` within one scope.
    #[error("duplicate dmid={dmid} in {scope}")]
    DuplicateIdentifier { scope: String, dmid: String },
}

impl MivotError {
    /// Create an unresolved-reference error.
    pub fn unresolved(dmref: impl Into<String>) -> Self {
        Self::UnresolvedReference(dmref.into())
    }

    /// Create a circular-reference error.
    pub fn circular(dmref: impl Into<String>) -> Self {
        Self::CircularReference(dmref.into())
    }

    /// Create a duplicate-identifier error for the global namespace.
    pub fn duplicate_global(dmid: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            scope: "GLOBALS".into(),
            dmid: dmid.into(),
        }
    }

    /// Create a duplicate-identifier error for a table-scoped namespace.
    pub fn duplicate_scoped(tableref: &str, dmid: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            scope: format!("TEMPLATES tableref={tableref}"),
            dmid: dmid.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MivotError>;
