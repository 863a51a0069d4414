//! Shared types and models for the crop recommendation service
//!
//! This crate contains types shared between the backend, the form UI (via WASM),
//! and other components of the system.

pub mod models;
pub mod prompt;
pub mod types;
pub mod validation;

pub use models::*;
pub use prompt::build_prompt;
pub use types::*;
pub use validation::*;
