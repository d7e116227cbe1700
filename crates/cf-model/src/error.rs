//! Error types for CF classification and resolution.

use thiserror::Error;

/// Result type alias using CfError.
pub type CfResult<T> = Result<T, CfError>;

/// Primary error type for CF metadata operations.
#[derive(Debug, Error)]
pub enum CfError {
    /// Direct lookup of a variable name that is not in the group.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// Access to an attribute that is not declared on the variable.
    #[error("attribute '{attribute}' not declared on variable '{variable}'")]
    AttributeMissing { variable: String, attribute: String },

    /// Access to a dataset-level attribute that is not declared.
    #[error("global attribute not found: {0}")]
    GlobalAttributeMissing(String),

    /// The backing store returned metadata that violates its contract.
    #[error("invalid variable metadata: {0}")]
    InvalidMetadata(String),

    /// Internal bookkeeping failure during group assembly. Signals a bug
    /// in the classifier or resolver, not a data-quality issue.
    #[error("internal consistency error: {0}")]
    Inconsistency(String),
}

impl CfError {
    /// Create an AttributeMissing error.
    pub fn attribute_missing(variable: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::AttributeMissing {
            variable: variable.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an InvalidMetadata error.
    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Create an Inconsistency error.
    pub fn inconsistency(msg: impl Into<String>) -> Self {
        Self::Inconsistency(msg.into())
    }
}
