//! Session orchestration for one idle RPG character.
//!
//! This crate owns the state `idle-core` operates on and drives it through
//! time: regeneration ticks, buff expiry and timed work. Consumers embed a
//! [`CharacterSession`], feed it commands and wall-clock timestamps, and
//! persist it through [`SaveState`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its commands
//! - [`work`] implements timed work with exclusive outcomes
//! - [`save`] is the persistence boundary (JSON blobs, no filesystem)
//! - [`config`] reads environment configuration and loads content
//! - [`logging`] installs the tracing subscriber
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod save;
pub mod session;
pub mod work;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use ids::ClockInstanceIds;
pub use logging::init_logging;
pub use save::SaveState;
pub use session::{CharacterSession, TickReport, WorkReport};
pub use work::{WorkStatus, WorkTimer};
