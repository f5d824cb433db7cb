//! Shared utilities for hedge-rs
//!
//! This crate provides common functionality used across the hedge-rs
//! workspace: logging setup and environment-variable configuration.

pub mod config;
pub mod logging;

pub use config::AppConfig;
pub use logging::init_tracing;
