//! SQLite statement executor.
//!
//! Implements the relational half of `iyiye_core::statement` on top of
//! rusqlite and tokio-rusqlite: one transaction per batch, sequential
//! statements, all-or-nothing.

mod conversions;
mod error;
mod executor;

pub use executor::SqliteExecutor;
