//! Core domain types
//!
//! These types mirror the remote entities the orchestrator reads and writes.
//! Every entity keeps the fields it does not model in a flattened map so that
//! read-modify-replace round trips never drop data.

pub mod annotation;
pub mod pipeline;
pub mod trigger;
