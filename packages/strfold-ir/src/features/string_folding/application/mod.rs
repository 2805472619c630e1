// Use cases of the string folding analysis
//
// - interpreter: per-statement transfer function
// - static_fields: literal initializers from the static initializer
// - flow_functions: IFDSProblem with the four flow functions
// - analysis: setup, run and result queries

pub mod analysis;
pub mod flow_functions;
pub mod interpreter;
pub mod static_fields;

pub use analysis::{FoldingResult, StringFoldingAnalysis, DEFAULT_ENTRY_METHOD};
pub use flow_functions::{FoldingOptions, StringFoldingProblem};
pub use interpreter::StringFoldingInterpreter;
pub use static_fields::StaticFieldResolver;
