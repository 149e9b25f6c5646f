//! Core types for aura-chat
//!
//! This crate provides the configuration, error, logging, and session
//! persistence foundations used by all other aura-chat components.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
