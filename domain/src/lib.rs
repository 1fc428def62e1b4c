//! Client-side domain layer for the WorkAI backend.
//!
//! Composes the credential machinery from `platform-auth` and the agent
//! surfaces from `agents` into the operations the feature views call:
//! session lifecycle, platform connections with automatic token refresh,
//! and content generation. Nothing here renders anything; errors propagate
//! to the view layer, which owns presentation.

pub mod connection;
pub mod content;
pub mod error;
pub mod gateway;
pub mod session;
pub mod user;

pub use error::Error;
pub use session::{SessionContext, SessionState};
pub use user::User;
