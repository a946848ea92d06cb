//! civforge-core: Client library for CivForge world agents
//!
//! Provides:
//! - Configuration resolution (flags/env, civforge.toml, defaults)
//! - Observation and action types
//! - Blocking HTTP client for the agent observe/act endpoints

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod observation;

pub use action::{Action, ActionResult};
pub use client::AgentClient;
pub use config::{AgentConfig, AgentIdentity, ConfigSource, DEFAULT_BASE_URL, DEFAULT_WORLD_ID};
pub use error::{ConfigError, Error, HttpError, Result, SchemaError};
pub use observation::Observation;
