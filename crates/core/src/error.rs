//! Error types for graphcache
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every error aborts the write in progress. Records already written before
//! the failure stay in the store; callers wanting all-or-nothing writes work
//! on a snapshot and swap it in on success.

use std::io;
use thiserror::Error;

/// Result type alias for graphcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for graphcache
#[derive(Debug, Error)]
pub enum Error {
    /// An identity function returned an id using the generated-id sentinel
    #[error("IDs returned by the identity function cannot begin with the \"$\" character (got {id:?})")]
    InvalidIdentity {
        /// Offending id
        id: String,
    },

    /// A write would replace a stable id with a generated one
    #[error(
        "Store error: the application attempted to write an object with no provided id but the store already contains an id of {existing_id} for this object"
    )]
    IdentityConflict {
        /// Stable id already held by the slot
        existing_id: String,
    },

    /// A fragment spread names no known fragment
    #[error("No fragment named {name}")]
    UnknownFragment {
        /// Fragment name
        name: String,
    },

    /// The document cannot be used for the requested operation
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A conditional-inclusion directive carries a non-boolean argument
    #[error("Invalid argument value for the @{directive} directive")]
    InvalidDirective {
        /// Directive name, without the `@`
        directive: String,
    },

    /// A selected field is absent from a stored record
    #[error("Can't find field {field} on object {id}")]
    MissingField {
        /// Record id
        id: String,
        /// Storage field key
        field: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (reading configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether this error is a consistency violation of the store's identity rules
    pub fn is_identity_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidIdentity { .. } | Error::IdentityConflict { .. }
        )
    }
}
