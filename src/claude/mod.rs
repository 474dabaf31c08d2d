//! Claude Code session data.

pub mod sessions;

pub use sessions::{ClaudeSession, ClaudeSessions, SessionSource, SessionSummary};
