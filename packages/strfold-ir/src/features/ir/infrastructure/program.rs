/*
 * In-memory program model
 *
 * Owns every method body of the analyzed program and indexes them by
 * signature (call resolution) and by declaring class (entry point and
 * static initializer lookup).
 */

use rustc_hash::FxHashMap;

use crate::features::ir::domain::{Method, MethodId, MethodSignature, Stmt, StmtId};

#[derive(Debug, Clone, Default)]
pub struct Program {
    methods: Vec<Method>,
    by_signature: FxHashMap<MethodSignature, MethodId>,
    by_class: FxHashMap<String, Vec<MethodId>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method body; a later body with the same signature shadows the earlier one
    pub fn add_method(&mut self, method: Method) -> MethodId {
        let id = MethodId(self.methods.len());
        self.by_signature.insert(method.signature.clone(), id);
        self.by_class
            .entry(method.declaring_class().to_string())
            .or_insert_with(Vec::new)
            .push(id);
        self.methods.push(method);
        id
    }

    pub fn method(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(id.0)
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (MethodId(i), m))
    }

    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.method(id.method).and_then(|m| m.stmt(id.index))
    }

    /// Resolve an invoked signature to a method with a body
    pub fn resolve(&self, signature: &MethodSignature) -> Option<MethodId> {
        self.by_signature.get(signature).copied()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.by_class.contains_key(class)
    }

    pub fn class_methods(&self, class: &str) -> &[MethodId] {
        self.by_class.get(class).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// First method of `class` named `name`
    pub fn find_method(&self, class: &str, name: &str) -> Option<MethodId> {
        self.class_methods(class)
            .iter()
            .copied()
            .find(|id| self.methods[id.0].name() == name)
    }

    pub fn static_initializer(&self, class: &str) -> Option<MethodId> {
        self.class_methods(class)
            .iter()
            .copied()
            .find(|id| self.methods[id.0].is_static_initializer())
    }

    /// Owning class of a method
    pub fn class_of(&self, id: MethodId) -> Option<&str> {
        self.method(id).map(|m| m.declaring_class())
    }

    /// Human-readable name for logs and reports
    pub fn describe(&self, id: MethodId) -> String {
        self.method(id)
            .map(|m| m.signature.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}
