/*
 * String Folding Feature
 *
 * Interprocedural constant folding of strings built from literals,
 * String.concat and StringBuilder/StringBuffer chains.
 *
 * Hexagonal Architecture:
 * - domain: abstract values, environments, primitive registry, constants table
 * - application: interpreter, flow functions, analysis driver
 * - ports: serializable report for consumers
 */

pub mod application;
pub mod domain;
pub mod ports;

pub use application::{
    FoldingOptions, FoldingResult, StaticFieldResolver, StringFoldingAnalysis,
    StringFoldingInterpreter, StringFoldingProblem,
};
pub use domain::{
    AbstractValue, CallContext, Environment, MethodConstantsTable, PrimitiveRegistry, ReturnLink,
    SharedConstantsTable, StringPrimitive, TableMode, TableStatistics,
};
pub use ports::FoldingReport;
