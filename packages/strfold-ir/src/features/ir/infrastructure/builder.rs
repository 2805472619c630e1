/*
 * Fluent method builder
 *
 * Declares locals as they are first defined, and emits the identity
 * statements for `this`/parameters in the order they are declared, so
 * callers should declare the receiver and parameters before any other
 * statement.
 */

use crate::features::ir::domain::{
    IdentityRef, Immediate, InvokeExpr, Local, Method, MethodSignature, Place, Rvalue, Stmt,
};

#[derive(Debug, Clone)]
pub struct MethodBuilder {
    signature: MethodSignature,
    locals: Vec<Local>,
    parameters: Vec<Local>,
    body: Vec<Stmt>,
}

impl MethodBuilder {
    pub fn new(declaring_class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            signature: MethodSignature::new(declaring_class, name, &[], "void"),
            locals: Vec::new(),
            parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.signature.return_type = ty.into();
        self
    }

    /// `name := @this`
    pub fn this(mut self, name: &str) -> Self {
        let local = self.declare(name);
        self.body.push(Stmt::Identity {
            local,
            rhs: IdentityRef::This,
        });
        self
    }

    /// `name := @parameterN`, appending `ty` to the signature
    pub fn param(mut self, name: &str, ty: impl Into<String>) -> Self {
        let local = self.declare(name);
        let index = self.parameters.len();
        self.signature.params.push(ty.into());
        self.parameters.push(local.clone());
        self.body.push(Stmt::Identity {
            local,
            rhs: IdentityRef::Parameter(index),
        });
        self
    }

    /// Declare a local without defining it
    pub fn local(mut self, name: &str) -> Self {
        self.declare(name);
        self
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        if let Some(local) = stmt.defined_local() {
            let name = local.name().to_string();
            self.declare(&name);
        }
        self.body.push(stmt);
        self
    }

    pub fn assign(self, dest: &str, rhs: Rvalue) -> Self {
        self.stmt(Stmt::Assign {
            lhs: Place::Local(Local::new(dest)),
            rhs,
        })
    }

    pub fn assign_str(self, dest: &str, text: &str) -> Self {
        self.assign(dest, Rvalue::string(text))
    }

    pub fn copy(self, dest: &str, src: &str) -> Self {
        self.assign(dest, Rvalue::Local(Local::new(src)))
    }

    pub fn invoke(self, expr: InvokeExpr) -> Self {
        self.stmt(Stmt::Invoke(expr))
    }

    pub fn ret(self, op: Immediate) -> Self {
        self.stmt(Stmt::Return(op))
    }

    pub fn ret_void(self) -> Self {
        self.stmt(Stmt::ReturnVoid)
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn build(self) -> Method {
        Method {
            signature: self.signature,
            locals: self.locals,
            parameters: self.parameters,
            body: self.body,
        }
    }

    fn declare(&mut self, name: &str) -> Local {
        let local = Local::new(name);
        if !self.locals.contains(&local) {
            self.locals.push(local.clone());
        }
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_declares_locals_and_params() {
        let method = MethodBuilder::new("A", "foo")
            .returns("java.lang.String")
            .param("p", "java.lang.String")
            .assign_str("s", "x")
            .copy("t", "s")
            .ret(Immediate::local("p"))
            .build();

        assert_eq!(method.signature.params, vec!["java.lang.String".to_string()]);
        assert_eq!(method.parameters, vec![Local::new("p")]);
        assert_eq!(
            method.locals,
            vec![Local::new("p"), Local::new("s"), Local::new("t")]
        );
        assert_eq!(
            method.body[0],
            Stmt::Identity {
                local: Local::new("p"),
                rhs: IdentityRef::Parameter(0)
            }
        );
        assert_eq!(method.body.len(), 4);
    }
}
