// Program model consumed by the string folding analysis
//
// - domain: statements, values, method bodies
// - ports: InterproceduralCfg trait walked by the tabulation solver
// - infrastructure: in-memory Program, its ICFG, and a method builder

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::{MethodBuilder, Program, ProgramIcfg};
pub use ports::InterproceduralCfg;
