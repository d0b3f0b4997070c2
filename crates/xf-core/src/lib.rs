//! Core infrastructure for the xfgen lighting generator
//!
//! This crate provides the error types, configuration, and logging setup
//! shared by the generator crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, DebugConfig, LogLevel, NumericMode, ShaderConfig, StageKind};
pub use error::{FunctionField, GeneratorError, LightingError, Result};
