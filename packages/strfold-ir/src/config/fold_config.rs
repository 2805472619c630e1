//! String folding analysis configuration
//!
//! YAML schema v1 is flat: `version`, an optional `preset` naming the base
//! configuration, and any field of [`StringFoldConfig`] as an override.
//!
//! ```yaml
//! version: 1
//! preset: fast
//! table_mode: per_call_site
//! max_iterations: 50000
//! extra_primitives:
//!   - declaring_class: org.apache.commons.text.TextStringBuilder
//!     method: append
//!     params: [java.lang.String]
//!     tag: append
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::features::string_folding::domain::{PrimitiveRegistry, StringPrimitive, TableMode};

/// Schema versions this crate reads
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

const MAX_ITERATIONS_LIMIT: usize = 10_000_000;
const MAX_PATH_EDGES_LIMIT: usize = 100_000_000;

/// Additional string primitive registered on top of the java.lang defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveSpec {
    pub declaring_class: String,
    pub method: String,
    #[serde(default)]
    pub params: Vec<String>,
    pub tag: StringPrimitive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringFoldConfig {
    /// How callee environments are keyed in the constants table
    pub table_mode: TableMode,

    /// Bind string literal arguments to callee parameters
    pub bind_literal_arguments: bool,

    /// Fail setup when the entry class has no static initializer
    pub require_static_initializer: bool,

    /// Resolve static field reads through the static initializer
    pub resolve_static_fields: bool,

    /// Solver iteration cap (1..=10_000_000, None = unbounded)
    pub max_iterations: Option<usize>,

    /// Solver path edge cap (1..=100_000_000, None = unbounded)
    pub max_path_edges: Option<usize>,

    /// Return an error instead of a partial result when a cap is hit
    pub fail_on_limit: bool,

    pub extra_primitives: Vec<PrimitiveSpec>,
}

impl Default for StringFoldConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl StringFoldConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                table_mode: TableMode::PerMethod,
                bind_literal_arguments: true,
                require_static_initializer: false,
                resolve_static_fields: false,
                max_iterations: Some(10_000),
                max_path_edges: Some(100_000),
                fail_on_limit: false,
                extra_primitives: Vec::new(),
            },
            Preset::Balanced => Self {
                table_mode: TableMode::PerCallSite,
                bind_literal_arguments: true,
                require_static_initializer: true,
                resolve_static_fields: true,
                max_iterations: Some(1_000_000),
                max_path_edges: None,
                fail_on_limit: false,
                extra_primitives: Vec::new(),
            },
            Preset::Thorough => Self {
                table_mode: TableMode::PerCallSite,
                bind_literal_arguments: true,
                require_static_initializer: true,
                resolve_static_fields: true,
                max_iterations: None,
                max_path_edges: None,
                fail_on_limit: true,
                extra_primitives: Vec::new(),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(max) = self.max_iterations {
            if max == 0 || max > MAX_ITERATIONS_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "max_iterations",
                    max,
                    1,
                    MAX_ITERATIONS_LIMIT,
                    "Use null for an unbounded run",
                ));
            }
        }

        if let Some(max) = self.max_path_edges {
            if max == 0 || max > MAX_PATH_EDGES_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "max_path_edges",
                    max,
                    1,
                    MAX_PATH_EDGES_LIMIT,
                    "Use null for an unbounded run",
                ));
            }
        }

        if self.require_static_initializer && !self.resolve_static_fields {
            return Err(ConfigError::Validation(
                "require_static_initializer needs resolve_static_fields to be enabled".to_string(),
            ));
        }

        for spec in &self.extra_primitives {
            if spec.declaring_class.is_empty() || spec.method.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "extra primitive '{}.{}' needs a declaring class and a method name",
                    spec.declaring_class, spec.method
                )));
            }
        }

        Ok(())
    }

    /// Default java.lang primitives plus `extra_primitives`
    pub fn primitive_registry(&self) -> PrimitiveRegistry {
        let mut registry = PrimitiveRegistry::java_lang();
        for spec in &self.extra_primitives {
            registry.register(&spec.declaring_class, &spec.method, spec.params.as_slice(), spec.tag);
        }
        registry
    }

    /// Load from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse YAML schema v1: preset base, remaining keys override it
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let mut doc: Mapping = serde_yaml::from_str(yaml)?;

        let version = doc.remove("version").ok_or(ConfigError::MissingVersion)?;
        let version: u32 = serde_yaml::from_value(version)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match doc.remove("preset") {
            Some(value) => serde_yaml::from_value(value)?,
            None => Preset::default(),
        };

        let mut merged = match serde_yaml::to_value(Self::from_preset(preset))? {
            Value::Mapping(base) => base,
            _ => Mapping::new(),
        };
        for (key, value) in doc {
            merged.insert(key, value);
        }

        let config: Self = serde_yaml::from_value(Value::Mapping(merged))?;
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML schema v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let mut doc = Mapping::new();
        doc.insert(Value::from("version"), serde_yaml::to_value(SUPPORTED_VERSIONS[0])?);
        if let Value::Mapping(fields) = serde_yaml::to_value(self)? {
            doc.extend(fields);
        }
        Ok(serde_yaml::to_string(&doc)?)
    }

    /// Builder: Set table_mode
    pub fn table_mode(mut self, mode: TableMode) -> Self {
        self.table_mode = mode;
        self
    }

    /// Builder: Set bind_literal_arguments
    pub fn bind_literal_arguments(mut self, v: bool) -> Self {
        self.bind_literal_arguments = v;
        self
    }

    /// Builder: Set require_static_initializer
    pub fn require_static_initializer(mut self, v: bool) -> Self {
        self.require_static_initializer = v;
        self
    }

    /// Builder: Set resolve_static_fields
    pub fn resolve_static_fields(mut self, v: bool) -> Self {
        self.resolve_static_fields = v;
        self
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: Option<usize>) -> Self {
        self.max_iterations = v;
        self
    }

    /// Builder: Set max_path_edges
    pub fn max_path_edges(mut self, v: Option<usize>) -> Self {
        self.max_path_edges = v;
        self
    }

    /// Builder: Set fail_on_limit
    pub fn fail_on_limit(mut self, v: bool) -> Self {
        self.fail_on_limit = v;
        self
    }

    /// Builder: Register an extra primitive
    pub fn primitive(mut self, spec: PrimitiveSpec) -> Self {
        self.extra_primitives.push(spec);
        self
    }
}
