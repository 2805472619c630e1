use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::ir::domain::StmtId;

/// Activation context an environment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CallContext {
    /// The entry method's own activation
    Entry,

    /// Shared context of every callee activation (per-method table mode)
    Global,

    /// Callee activation created by the call at this statement
    CallSite(StmtId),
}

impl fmt::Display for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallContext::Entry => f.write_str("entry"),
            CallContext::Global => f.write_str("global"),
            CallContext::CallSite(stmt) => write!(f, "call@{}", stmt),
        }
    }
}
