pub mod builder;
pub mod icfg;
pub mod program;

pub use builder::MethodBuilder;
pub use icfg::ProgramIcfg;
pub use program::Program;
