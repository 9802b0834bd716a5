//! Session lifecycle management for Duelhall.
//!
//! Each matched pair of players gets a session: an isolated Tokio task
//! (actor model) that owns the game state and both connections' write
//! side until the game ends.
//!
//! # Key types
//!
//! - [`GameRules`]: the trait every game variant implements
//! - [`SessionManager`]: spawns sessions, routes messages to them
//! - [`SessionHandle`]: send commands to a running session actor
//! - [`SessionConfig`]: turn timeout and channel sizing
//! - [`SessionEnded`]: what an actor reports when it stops

mod config;
mod error;
mod manager;
mod rules;
mod session;

pub use config::{SessionConfig, SessionEnded, SessionOutcome};
pub use error::SessionError;
pub use manager::SessionManager;
pub use rules::{GameRules, Outbound};
pub use session::{SessionHandle, spawn_session};
