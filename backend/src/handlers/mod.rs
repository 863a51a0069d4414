//! HTTP request handlers

mod catalog;
mod health;
mod prediction;
mod session;

pub use catalog::*;
pub use health::*;
pub use prediction::*;
pub use session::*;
