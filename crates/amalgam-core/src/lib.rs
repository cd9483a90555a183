//! Amalgam Core
//!
//! Shared types for the cpp-amalgamate workspace: file categories,
//! scan outcomes, emission queues, configuration and the error type.

pub mod config;
pub mod error;
pub mod queue;
pub mod types;

pub use config::AmalgamConfig;
pub use error::{Error, Result};
pub use queue::EmissionQueues;
pub use types::*;
