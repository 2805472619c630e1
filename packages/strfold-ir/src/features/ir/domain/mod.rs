pub mod method;
pub mod stmt;
pub mod values;

pub use method::{Method, MethodId, StmtId};
pub use stmt::{IdentityRef, InvokeExpr, InvokeKind, Place, Rvalue, Stmt, StmtKind};
pub use values::{Constant, FieldSignature, Immediate, Local, MethodSignature};
