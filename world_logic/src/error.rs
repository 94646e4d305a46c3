//! Error types shared by every logic operation.

use thiserror::Error;

/// Contract violations raised by the logic core.
///
/// Irreversible rules are not errors; see [`crate::Reversal`].
#[derive(Debug, Error)]
pub enum LogicError {
    /// A mapping bound a placeholder to an object of an incompatible type.
    #[error("cannot bind `{placeholder}` to `{variable}`: type `{found}` is not a subtype of `{expected}`")]
    IllTypedBinding {
        placeholder: String,
        variable: String,
        expected: String,
        found: String,
    },

    /// A mapping left a placeholder of the rule unbound.
    #[error("rule `{rule}` has no binding for placeholder `{placeholder}`")]
    IncompleteBinding { rule: String, placeholder: String },

    /// An action was applied to a state missing one of its preconditions.
    #[error("action `{action}` is not applicable: `{missing}` does not hold")]
    InapplicableAction { action: String, missing: String },

    /// A serialized record could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    /// A placeholder showed up where only ground facts are allowed.
    #[error("proposition `{0}` is not ground")]
    NotGround(String),

    /// A rule effect mentions a placeholder its preconditions never bind.
    #[error("rule `{rule}` introduces free placeholder `{placeholder}` in its postconditions")]
    FreePlaceholder { rule: String, placeholder: String },

    /// A type tag is missing from the hierarchy.
    #[error("unknown type `{0}`")]
    UnknownType(String),
}

/// Result alias for logic operations.
pub type Result<T> = std::result::Result<T, LogicError>;
