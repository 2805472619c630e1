/*
 * Method bodies
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stmt::{Place, Rvalue, Stmt};
use super::values::{FieldSignature, Local, MethodSignature};

/// Dense index of a method inside a `Program`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodId(pub usize);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Statement address: owning method plus position in its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StmtId {
    pub method: MethodId,
    pub index: usize,
}

impl StmtId {
    pub fn new(method: MethodId, index: usize) -> Self {
        Self { method, index }
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub signature: MethodSignature,

    /// Every local declared in the body, parameters included
    pub locals: Vec<Local>,

    /// Parameter locals by formal position
    pub parameters: Vec<Local>,

    pub body: Vec<Stmt>,
}

impl Method {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn declaring_class(&self) -> &str {
        &self.signature.declaring_class
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_local(&self, index: usize) -> Option<&Local> {
        self.parameters.get(index)
    }

    pub fn stmt(&self, index: usize) -> Option<&Stmt> {
        self.body.get(index)
    }

    pub fn is_static_initializer(&self) -> bool {
        self.signature.is_static_initializer()
    }

    /// Static-field stores in body order: `(field, right-hand side)`
    pub fn field_initializers(&self) -> impl Iterator<Item = (&FieldSignature, &Rvalue)> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::Assign {
                lhs: Place::StaticField(field),
                rhs,
            } => Some((field, rhs)),
            _ => None,
        })
    }
}
