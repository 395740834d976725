//! Agent configuration document
//!
//! The agent's publisher and server settings live in a JSON document on
//! disk. This crate owns the document schema and its file round-trip;
//! nothing here talks to the network.

mod settings;

pub use settings::{AgentConfiguration, ConfigError, PublisherSettings, ServerSettings};
