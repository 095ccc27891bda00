//! DynamoDB statement executor.
//!
//! Implements the key-value half of `iyiye_core::statement` with PartiQL
//! `ExecuteStatement` calls. Key-value batches carry exactly one statement;
//! the registry enforces that at build time.

mod conversions;
mod error;
mod executor;

pub use executor::DynamoDbExecutor;
