//! SQLite storage implementation for Quill.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite:
//! - Database connection pooling and management
//! - Diesel migrations
//! - A single writer actor that serializes writes
//! - The prompt template repository, which implements `quill_ai::TemplateStore`
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The chat core only sees the `TemplateStore` trait.
//!
//! ```text
//!        ai (chat core)
//!              │  TemplateStore
//!              ▼
//!     storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod templates;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{Result, StorageError};
pub use templates::{NewPromptTemplate, PromptTemplateRecord, PromptTemplateRepository};
