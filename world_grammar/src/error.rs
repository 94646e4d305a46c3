//! Registry loading errors.

use std::path::PathBuf;
use thiserror::Error;
use world_logic::LogicError;

/// Failures while loading or validating a rules document.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("failed to read rules from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rules document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("duplicate rule `{0}`")]
    DuplicateRule(String),

    /// A `[reverse]` or `irreversible` entry names a rule that was never declared.
    #[error("`{section}` refers to unknown rule `{rule}`")]
    UnknownRule { section: &'static str, rule: String },

    /// A type whose parents can never be declared (missing or cyclic).
    #[error("type `{0}` has an undeclared parent or is part of a cycle")]
    UnresolvedType(String),

    #[error(transparent)]
    Logic(#[from] LogicError),
}

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, GrammarError>;
