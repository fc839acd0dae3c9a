//! Flock Core Social Graph Engine
//!
//! This crate provides the data model, storage layer, and graph services for
//! the Flock social network backend.
//!
//! # Architecture
//!
//! - **Graph-native storage**: users and posts are records, `follows` and
//!   `posted` are relation tables in an embedded SurrealDB instance
//! - **Typed rows**: every store operation decodes into a fixed result struct
//!   at the store boundary
//! - **Constructor injection**: the store handle is built once at process
//!   start and passed into each service, never looked up globally
//!
//! # Modules
//!
//! - [`models`] - Data structures (profiles, feed posts, validation)
//! - [`db`] - Storage layer with SurrealDB integration
//! - [`services`] - Graph services (UserDirectory, SocialGraph, FeedAssembler)

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;
