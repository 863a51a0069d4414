//! Business logic services for the crop recommendation service

pub mod recommendation;
pub mod session;

pub use recommendation::RecommendationService;
pub use session::{Session, SessionService, SessionState, SessionStore};
