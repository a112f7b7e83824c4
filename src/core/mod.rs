//! Core functionality module
//!
//! This module contains the core business logic for the camera roll gallery,
//! including configuration management, error handling, the photo data model,
//! and the gallery store itself.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and management
//! - `error` - Error types and result aliases
//! - `photo` - Photo data model and manifest serialization
//! - `store` - The photo gallery store and its operations

pub mod config;
pub mod error;
pub mod photo;
pub mod store;
