//! Domain models for the crop recommendation service

mod conversation;
mod crop;
mod features;
mod recommendation;

pub use conversation::*;
pub use crop::*;
pub use features::*;
pub use recommendation::*;
