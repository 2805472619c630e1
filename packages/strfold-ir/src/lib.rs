/*
 * strfold-ir - Interprocedural String Constant Folding
 *
 * Feature-First Hexagonal Architecture:
 * - config/    : Presets, YAML v1 loading, validation
 * - features/  : Vertical slices (ir → ifds → string_folding)
 * - errors     : Setup and run failures
 *
 * The analysis threads one environment (local → Unknown | Known(text)) per
 * method activation through a Reps/Horwitz/Sagiv tabulation solver and
 * stitches returned values back into callers via a per-call-site
 * constants table.
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::type_complexity)] // Solver tables are nested maps

pub mod config;
pub mod errors;
pub mod features;

pub use config::{ConfigError, ConfigResult, Preset, PrimitiveSpec, StringFoldConfig};
pub use errors::{Result, StrFoldError};
pub use features::ifds::{IFDSSolver, IFDSSolverResult, IFDSStatistics};
pub use features::ir::{InterproceduralCfg, MethodBuilder, Program, ProgramIcfg};
pub use features::string_folding::{
    AbstractValue, CallContext, Environment, FoldingReport, FoldingResult, MethodConstantsTable,
    PrimitiveRegistry, ReturnLink, StringFoldingAnalysis, StringPrimitive, TableMode,
};
