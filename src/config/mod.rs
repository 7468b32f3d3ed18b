//! Configuration module for FinTrack
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Remote backend detection

pub mod paths;
pub mod settings;

pub use paths::FintrackPaths;
pub use settings::{RemoteSettings, Settings};
