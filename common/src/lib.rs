//! Shared types for the section builder.
//!
//! - `model`: section kinds, their schemas and typed configuration models.
//! - `requests`: JSON payloads exchanged between the editor and the backend.
//! - `draft`: the configuration draft manager (field store, local mirror,
//!   snapshot hashing, remote synchronization and the publish gate).

pub mod draft;
pub mod model;
pub mod requests;
