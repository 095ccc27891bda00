//! Core resolver model for the iyiye API.
//!
//! This crate contains the pure parts of the resolver mapping engine: the
//! request/operation model, statement templates and rendering, response
//! shaping, the resolver registry, and the executor seams that backend
//! implementations plug into. It performs no I/O of its own — all backend
//! access goes through the [`statement::StatementExecutor`] and
//! [`statement::FunctionInvoker`] traits implemented by the service crate.

pub mod resolver;
pub mod statement;
