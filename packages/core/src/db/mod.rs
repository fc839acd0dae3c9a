//! Storage Layer
//!
//! This module handles all graph store interactions using SurrealDB:
//!
//! - Store initialization and schema definition (tables, relation tables,
//!   uniqueness indexes)
//! - One typed query method per engine operation
//! - Embedded RocksDB for deployment, in-memory engine for tests, HTTP
//!   client for a remote SurrealDB server
//!
//! # Architecture
//!
//! The store is the only component that speaks SurrealQL. Every method is a
//! single parametrized query round trip (multi-statement batches count as
//! one round trip) and decodes its rows into a fixed result struct before
//! returning, so the services never touch dynamic record shapes.

mod error;
mod graph_store;

pub use error::StoreError;
pub use graph_store::{
    EmbeddedStore, FeedRow, FollowHop, FollowOutcome, FollowerCount, GraphStore, HttpStore,
    RankedRows, SuggestionRows,
};
