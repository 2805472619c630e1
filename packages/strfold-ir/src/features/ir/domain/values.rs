/*
 * Three-address IR values
 *
 * Jimple-style operands: locals, constants, immediates, and the
 * signatures used to name fields and methods.
 *
 * Signatures render in the bytecode-tool convention:
 *   <java.lang.StringBuilder: java.lang.StringBuilder append(java.lang.String)>
 *   <jlink.Test: java.lang.String GREETING>
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared local or parameter local, scoped to one method body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Local(String);

impl Local {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Local {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Local {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Literal operand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Str(String),
    Int(i64),
    Null,
    /// `Foo.class`
    Class(String),
}

impl Constant {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Str(s) => write!(f, "\"{}\"", s),
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Null => f.write_str("null"),
            Constant::Class(c) => write!(f, "class \"{}\"", c),
        }
    }
}

/// Operand that needs no evaluation: a local or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Immediate {
    Local(Local),
    Constant(Constant),
}

impl Immediate {
    pub fn local(name: impl Into<String>) -> Self {
        Immediate::Local(Local::new(name))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Immediate::Constant(Constant::Str(text.into()))
    }

    pub fn as_local(&self) -> Option<&Local> {
        match self {
            Immediate::Local(l) => Some(l),
            Immediate::Constant(_) => None,
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Local(l) => write!(f, "{}", l),
            Immediate::Constant(c) => write!(f, "{}", c),
        }
    }
}

/// Fully qualified method signature
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub declaring_class: String,
    pub name: String,
    pub params: Vec<String>,
    pub return_type: String,
}

impl MethodSignature {
    pub fn new(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        params: &[&str],
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            return_type: return_type.into(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name == "<clinit>"
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}: {} {}({})>",
            self.declaring_class,
            self.return_type,
            self.name,
            self.params.join(",")
        )
    }
}

/// Fully qualified field signature
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldSignature {
    pub declaring_class: String,
    pub name: String,
    pub ty: String,
}

impl FieldSignature {
    pub fn new(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        ty: impl Into<String>,
    ) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for FieldSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {} {}>", self.declaring_class, self.ty, self.name)
    }
}
