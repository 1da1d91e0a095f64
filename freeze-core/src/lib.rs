//! Freeze Core
//!
//! Core types shared by the trigger-freeze crates.
//!
//! This crate contains:
//! - Domain types: remote entities as Codefresh serves them (Pipeline, TriggerRegistration, Annotation)
//! - DTOs: request and response envelopes for the Codefresh API
//! - Checkpoint: the typed form of the annotations used to remember suspended triggers

pub mod checkpoint;
pub mod domain;
pub mod dto;
