//! External API integrations

pub mod advice;

pub use advice::{AdviceClient, AdviceOutcome, FALLBACK_ADVICE};
