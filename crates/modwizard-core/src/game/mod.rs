//! Game installation introspection
//!
//! This module provides:
//! - Framework version parsing and comparison
//! - PE file version reading
//! - Layout inspection (data folder, MelonLoader, runtime backend, app.info)
//! - Assembly reference resolution for generated projects

pub mod file_version;
pub mod layout;
pub mod references;
pub mod version;

pub use file_version::{FileVersionReader, PeVersionReader, VersionReadError};
pub use layout::{inspect, GameInfo, GameLayoutInspector, RuntimeBackend};
pub use references::{render_msbuild_items, resolve};
pub use version::FrameworkVersion;
