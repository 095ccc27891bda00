//! Statement executor implementations.
//!
//! This module provides concrete implementations of the executor traits
//! defined in `iyiye_core::statement`. The implementations are selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): relational executor using `rusqlite` and
//!   `tokio-rusqlite`
//! - `dynamodb`: key-value executor using `aws-sdk-dynamodb` PartiQL
//! - `inmemory` (default): scripted doubles for testing and local runs
//! - `lambda` (default): HTTP invoker for function data sources
//!
//! Executors are additive — one registry serves relational and key-value
//! data sources side by side — but every data source in the catalog needs
//! some backing implementation, real or in-memory.

#[cfg(all(not(feature = "sqlite"), not(feature = "inmemory")))]
compile_error!(
    "The relational notification data source needs a backing executor. \
    Enable the 'sqlite' feature or fall back to 'inmemory'."
);

#[cfg(all(not(feature = "dynamodb"), not(feature = "inmemory")))]
compile_error!(
    "The key-value kit data source needs a backing executor. \
    Enable the 'dynamodb' feature or fall back to 'inmemory'."
);

#[cfg(all(not(feature = "lambda"), not(feature = "inmemory")))]
compile_error!(
    "The user function data source needs a backing invoker. \
    Enable the 'lambda' feature or fall back to 'inmemory'."
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "lambda")]
pub mod lambda;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbExecutor;

#[cfg(feature = "inmemory")]
pub use inmemory::{InMemoryExecutor, MockFunctionInvoker};

#[cfg(feature = "lambda")]
pub use lambda::HttpFunctionInvoker;
