//! Analysis configuration
//!
//! Two levels:
//! - Preset: `StringFoldConfig::from_preset(Preset::Fast)`
//! - YAML v1: a preset plus field overrides, `StringFoldConfig::from_yaml(path)`
//!
//! # Examples
//!
//! ```rust,ignore
//! use strfold_ir::config::{Preset, StringFoldConfig};
//! use strfold_ir::TableMode;
//!
//! let config = StringFoldConfig::from_preset(Preset::Thorough)
//!     .table_mode(TableMode::PerMethod)
//!     .max_iterations(Some(50_000));
//! config.validate()?;
//! ```

pub mod error;
pub mod fold_config;
pub mod preset;

pub use error::{ConfigError, ConfigResult};
pub use fold_config::{PrimitiveSpec, StringFoldConfig, SUPPORTED_VERSIONS};
pub use preset::Preset;
