//! Business logic services that live outside the target database.

pub mod session;

pub use session::{SavedSession, SessionStore};
