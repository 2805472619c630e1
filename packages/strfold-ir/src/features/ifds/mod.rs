// IFDS tabulation engine
//
// - framework: facts, flow functions, problem trait
// - solver: worklist tabulation over an InterproceduralCfg

pub mod framework;
pub mod solver;

pub use framework::{
    DataflowFact, FlowFunction, IFDSProblem, IFDSStatistics, IdentityFlowFunction,
    KillFlowFunction, PathEdge,
};
pub use solver::{IFDSSolver, IFDSSolverResult};
