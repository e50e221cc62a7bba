//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the demon list core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the domain crates depend on.
//! It establishes the logging conventions, the configuration builder with
//! its fail-fast capability checks, and the event broadcasting used to
//! report content and navigation changes to the host.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, ResourceLayout, ScoringConfig};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus};
