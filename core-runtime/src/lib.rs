//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the authentication core and
//! its providers:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Auth event bus
//!
//! ## Overview
//!
//! Nothing in this crate knows about a particular storage provider. It fixes
//! the logging conventions, the configuration contract, and the event
//! broadcasting mechanism the other crates build on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
