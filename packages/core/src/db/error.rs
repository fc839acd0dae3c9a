//! Store Error Types
//!
//! Error types for graph store operations: connection and schema setup
//! failures, query execution failures, and row decoding failures. Higher
//! level outcomes (user not found, username taken) are modeled by the
//! service layer.

use thiserror::Error;

/// Name of the unique index that backs case-insensitive username uniqueness.
///
/// The service layer checks availability before writing; this index closes
/// the remaining race window between the check and the write.
pub(crate) const USERNAME_UNIQUE_INDEX: &str = "user_username_unique";

/// Graph store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open, connect to, or authenticate against the store
    #[error("Failed to connect to graph store: {context}")]
    ConnectionFailed {
        context: String,
        #[source]
        source: surrealdb::Error,
    },

    /// Failed to define the schema (tables, relations, indexes)
    #[error("Failed to initialize graph schema: {context}")]
    SchemaFailed {
        context: String,
        #[source]
        source: surrealdb::Error,
    },

    /// A query failed to execute
    #[error("Graph query failed: {context}")]
    QueryFailed {
        context: String,
        #[source]
        source: surrealdb::Error,
    },

    /// A result row could not be decoded into its typed struct
    #[error("Failed to decode graph result: {context}")]
    DecodeFailed {
        context: String,
        #[source]
        source: surrealdb::Error,
    },

    /// A statement that must produce a value produced none
    #[error("Graph query returned no result: {context}")]
    MissingResult { context: String },

    /// The username uniqueness index rejected a write
    #[error("Username is already taken: {username}")]
    UsernameTaken { username: String },
}

impl StoreError {
    /// Create a connection failed error
    pub fn connection(context: impl Into<String>, source: surrealdb::Error) -> Self {
        Self::ConnectionFailed {
            context: context.into(),
            source,
        }
    }

    /// Create a schema initialization error
    pub fn schema(context: impl Into<String>, source: surrealdb::Error) -> Self {
        Self::SchemaFailed {
            context: context.into(),
            source,
        }
    }

    /// Create a query failed error
    pub fn query(context: impl Into<String>, source: surrealdb::Error) -> Self {
        Self::QueryFailed {
            context: context.into(),
            source,
        }
    }

    /// Create a decode failed error
    pub fn decode(context: impl Into<String>, source: surrealdb::Error) -> Self {
        Self::DecodeFailed {
            context: context.into(),
            source,
        }
    }

    /// Create a missing result error
    pub fn missing(context: impl Into<String>) -> Self {
        Self::MissingResult {
            context: context.into(),
        }
    }

    /// Classify a write failure: a violation of the username uniqueness
    /// index becomes [`StoreError::UsernameTaken`], anything else is a plain
    /// query failure.
    pub(crate) fn from_username_write(
        context: impl Into<String>,
        username: &str,
        source: surrealdb::Error,
    ) -> Self {
        if source.to_string().contains(USERNAME_UNIQUE_INDEX) {
            Self::UsernameTaken {
                username: username.to_string(),
            }
        } else {
            Self::query(context, source)
        }
    }
}
