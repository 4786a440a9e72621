//! Debate session lifecycle.
//!
//! - [`entities::DebateSession`] - one debate's identity, config snapshot and status
//! - [`entities::SessionStatus`] - `idle → running → {completed, cancelled, failed}`
//! - [`result::SessionResult`] - the frozen outcome handed to callers

pub mod entities;
pub mod result;

pub use entities::{DebateSession, SessionId, SessionStatus};
pub use result::SessionResult;
