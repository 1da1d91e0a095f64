//! Data Transfer Objects for the Codefresh API
//!
//! Request bodies, query parameters and response envelopes that are not
//! entities in their own right.

pub mod annotation;
pub mod pipeline;
