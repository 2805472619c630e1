/*
 * Statements and expressions
 *
 * Closed set of statement shapes for a Jimple-like three-address IR.
 * Control transfers hold statement indices into the owning method body.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::values::{Constant, FieldSignature, Immediate, Local, MethodSignature};

/// Dispatch flavour of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeKind {
    Virtual,
    Special,
    Interface,
    Static,
}

/// Method invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvokeExpr {
    pub kind: InvokeKind,

    /// Receiver local (None for static calls)
    pub base: Option<Local>,

    pub method: MethodSignature,

    pub args: Vec<Immediate>,
}

impl InvokeExpr {
    pub fn instance(
        kind: InvokeKind,
        base: impl Into<Local>,
        method: MethodSignature,
        args: Vec<Immediate>,
    ) -> Self {
        Self {
            kind,
            base: Some(base.into()),
            method,
            args,
        }
    }

    pub fn static_call(method: MethodSignature, args: Vec<Immediate>) -> Self {
        Self {
            kind: InvokeKind::Static,
            base: None,
            method,
            args,
        }
    }

    pub fn arg(&self, index: usize) -> Option<&Immediate> {
        self.args.get(index)
    }
}

impl fmt::Display for InvokeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            InvokeKind::Virtual => "virtualinvoke",
            InvokeKind::Special => "specialinvoke",
            InvokeKind::Interface => "interfaceinvoke",
            InvokeKind::Static => "staticinvoke",
        };
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        match &self.base {
            Some(base) => write!(f, "{} {}.{}({})", kind, base, self.method, args.join(", ")),
            None => write!(f, "{} {}({})", kind, self.method, args.join(", ")),
        }
    }
}

/// Right-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rvalue {
    /// Copy from another local
    Local(Local),

    Constant(Constant),

    Invoke(InvokeExpr),

    /// `new T` (constructor runs in a separate `specialinvoke`)
    New(String),

    NewArray { element_type: String, size: Immediate },

    InstanceField { base: Local, field: FieldSignature },

    StaticField(FieldSignature),

    ArrayRead { base: Local, index: Immediate },

    Cast { ty: String, op: Immediate },

    BinOp { op: String, lhs: Immediate, rhs: Immediate },

    InstanceOf { ty: String, op: Immediate },

    Length(Immediate),
}

impl Rvalue {
    pub fn string(text: impl Into<String>) -> Self {
        Rvalue::Constant(Constant::Str(text.into()))
    }

    pub fn as_invoke(&self) -> Option<&InvokeExpr> {
        match self {
            Rvalue::Invoke(expr) => Some(expr),
            _ => None,
        }
    }
}

impl From<Immediate> for Rvalue {
    fn from(imm: Immediate) -> Self {
        match imm {
            Immediate::Local(l) => Rvalue::Local(l),
            Immediate::Constant(c) => Rvalue::Constant(c),
        }
    }
}

impl fmt::Display for Rvalue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rvalue::Local(l) => write!(f, "{}", l),
            Rvalue::Constant(c) => write!(f, "{}", c),
            Rvalue::Invoke(expr) => write!(f, "{}", expr),
            Rvalue::New(ty) => write!(f, "new {}", ty),
            Rvalue::NewArray { element_type, size } => {
                write!(f, "newarray ({})[{}]", element_type, size)
            }
            Rvalue::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            Rvalue::StaticField(field) => write!(f, "{}", field),
            Rvalue::ArrayRead { base, index } => write!(f, "{}[{}]", base, index),
            Rvalue::Cast { ty, op } => write!(f, "({}) {}", ty, op),
            Rvalue::BinOp { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Rvalue::InstanceOf { ty, op } => write!(f, "{} instanceof {}", op, ty),
            Rvalue::Length(op) => write!(f, "lengthof {}", op),
        }
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Place {
    Local(Local),
    InstanceField { base: Local, field: FieldSignature },
    StaticField(FieldSignature),
    ArrayElement { base: Local, index: Immediate },
}

impl Place {
    pub fn as_local(&self) -> Option<&Local> {
        match self {
            Place::Local(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Local(l) => write!(f, "{}", l),
            Place::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            Place::StaticField(field) => write!(f, "{}", field),
            Place::ArrayElement { base, index } => write!(f, "{}[{}]", base, index),
        }
    }
}

/// Right-hand side of an identity statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityRef {
    This,
    Parameter(usize),
    CaughtException,
}

impl fmt::Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityRef::This => f.write_str("@this"),
            IdentityRef::Parameter(i) => write!(f, "@parameter{}", i),
            IdentityRef::CaughtException => f.write_str("@caughtexception"),
        }
    }
}

/// Coarse statement classification used by the flow functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtKind {
    Assignment,
    IdentityBind,
    Invoke,
    Return,
    OtherControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    Assign { lhs: Place, rhs: Rvalue },
    Identity { local: Local, rhs: IdentityRef },
    Invoke(InvokeExpr),
    Return(Immediate),
    ReturnVoid,
    If { condition: String, target: usize },
    Goto { target: usize },
    Switch { key: Immediate, targets: Vec<usize>, default: usize },
    Throw(Immediate),
    EnterMonitor(Immediate),
    ExitMonitor(Immediate),
    Nop,
    Breakpoint,
}

impl Stmt {
    pub fn kind(&self) -> StmtKind {
        match self {
            Stmt::Assign { .. } => StmtKind::Assignment,
            Stmt::Identity { .. } => StmtKind::IdentityBind,
            Stmt::Invoke(_) => StmtKind::Invoke,
            Stmt::Return(_) | Stmt::ReturnVoid => StmtKind::Return,
            _ => StmtKind::OtherControl,
        }
    }

    /// Local written by this statement, if any
    pub fn defined_local(&self) -> Option<&Local> {
        match self {
            Stmt::Assign { lhs, .. } => lhs.as_local(),
            Stmt::Identity { local, .. } => Some(local),
            _ => None,
        }
    }

    /// Invocation carried by this statement, standalone or as an assignment source
    pub fn invoke_expr(&self) -> Option<&InvokeExpr> {
        match self {
            Stmt::Invoke(expr) => Some(expr),
            Stmt::Assign { rhs, .. } => rhs.as_invoke(),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        self.invoke_expr().is_some()
    }

    /// Statements after which control leaves the method
    pub fn is_exit(&self) -> bool {
        matches!(self, Stmt::Return(_) | Stmt::ReturnVoid | Stmt::Throw(_))
    }

    /// Whether control can fall through to the next statement
    pub fn falls_through(&self) -> bool {
        !matches!(
            self,
            Stmt::Return(_) | Stmt::ReturnVoid | Stmt::Throw(_) | Stmt::Goto { .. } | Stmt::Switch { .. }
        )
    }

    /// Explicit branch targets (fall-through excluded)
    pub fn branch_targets(&self) -> Vec<usize> {
        match self {
            Stmt::If { target, .. } | Stmt::Goto { target } => vec![*target],
            Stmt::Switch {
                targets, default, ..
            } => {
                let mut all = targets.clone();
                all.push(*default);
                all
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            Stmt::Identity { local, rhs } => write!(f, "{} := {}", local, rhs),
            Stmt::Invoke(expr) => write!(f, "{}", expr),
            Stmt::Return(op) => write!(f, "return {}", op),
            Stmt::ReturnVoid => f.write_str("return"),
            Stmt::If { condition, target } => write!(f, "if {} goto {}", condition, target),
            Stmt::Goto { target } => write!(f, "goto {}", target),
            Stmt::Switch {
                key,
                targets,
                default,
            } => write!(f, "switch({}) {:?} default {}", key, targets, default),
            Stmt::Throw(op) => write!(f, "throw {}", op),
            Stmt::EnterMonitor(op) => write!(f, "entermonitor {}", op),
            Stmt::ExitMonitor(op) => write!(f, "exitmonitor {}", op),
            Stmt::Nop => f.write_str("nop"),
            Stmt::Breakpoint => f.write_str("breakpoint"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat_sig() -> MethodSignature {
        MethodSignature::new(
            "java.lang.String",
            "concat",
            &["java.lang.String"],
            "java.lang.String",
        )
    }

    #[test]
    fn test_stmt_kinds() {
        let assign = Stmt::Assign {
            lhs: Place::Local(Local::new("s")),
            rhs: Rvalue::string("a"),
        };
        assert_eq!(assign.kind(), StmtKind::Assignment);
        assert_eq!(assign.defined_local(), Some(&Local::new("s")));
        assert!(!assign.is_call());

        let ident = Stmt::Identity {
            local: Local::new("p"),
            rhs: IdentityRef::Parameter(0),
        };
        assert_eq!(ident.kind(), StmtKind::IdentityBind);
        assert_eq!(ident.defined_local(), Some(&Local::new("p")));

        assert_eq!(Stmt::ReturnVoid.kind(), StmtKind::Return);
        assert_eq!(Stmt::Nop.kind(), StmtKind::OtherControl);
    }

    #[test]
    fn test_call_detection() {
        let call = Stmt::Assign {
            lhs: Place::Local(Local::new("s")),
            rhs: Rvalue::Invoke(InvokeExpr::instance(
                InvokeKind::Virtual,
                "s",
                concat_sig(),
                vec![Immediate::string("b")],
            )),
        };
        assert!(call.is_call());
        assert_eq!(call.invoke_expr().map(|e| e.method.name.as_str()), Some("concat"));
    }

    #[test]
    fn test_field_store_defines_nothing() {
        let store = Stmt::Assign {
            lhs: Place::StaticField(FieldSignature::new("A", "f", "java.lang.String")),
            rhs: Rvalue::string("x"),
        };
        assert_eq!(store.kind(), StmtKind::Assignment);
        assert!(store.defined_local().is_none());
    }

    #[test]
    fn test_control_flow_shape() {
        assert!(!Stmt::Goto { target: 3 }.falls_through());
        assert_eq!(Stmt::Goto { target: 3 }.branch_targets(), vec![3]);
        let switch = Stmt::Switch {
            key: Immediate::local("i"),
            targets: vec![1, 2],
            default: 4,
        };
        assert_eq!(switch.branch_targets(), vec![1, 2, 4]);
        assert!(Stmt::If {
            condition: "i == 0".into(),
            target: 5
        }
        .falls_through());
        assert!(Stmt::Throw(Immediate::local("e")).is_exit());
    }
}
