pub mod abstract_value;
pub mod constants_table;
pub mod context;
pub mod environment;
pub mod primitives;

pub use abstract_value::AbstractValue;
pub use constants_table::{
    MethodConstantsTable, ReturnLink, SharedConstantsTable, TableMode, TableStatistics,
};
pub use context::CallContext;
pub use environment::Environment;
pub use primitives::{PrimitiveRegistry, StringPrimitive};
