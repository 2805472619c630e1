/*
 * Interprocedural CFG over the in-memory program model
 *
 * Intra-procedural edges come from fall-through and explicit branch
 * targets. Call edges come from exact signature resolution: an invoke
 * whose signature has no body in the program (library calls such as
 * StringBuilder.append) has no callees and is handled entirely by the
 * call-to-return edge.
 */

use std::sync::Arc;

use crate::features::ir::domain::{MethodId, StmtId};
use crate::features::ir::infrastructure::program::Program;
use crate::features::ir::ports::InterproceduralCfg;

#[derive(Debug, Clone)]
pub struct ProgramIcfg {
    program: Arc<Program>,
}

impl ProgramIcfg {
    pub fn new(program: Arc<Program>) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }
}

impl InterproceduralCfg for ProgramIcfg {
    type Node = StmtId;
    type Method = MethodId;

    fn method_of(&self, node: &StmtId) -> MethodId {
        node.method
    }

    fn successors_of(&self, node: &StmtId) -> Vec<StmtId> {
        let Some(method) = self.program.method(node.method) else {
            return Vec::new();
        };
        let Some(stmt) = method.stmt(node.index) else {
            return Vec::new();
        };

        let len = method.body.len();
        let mut succs = Vec::new();
        if stmt.falls_through() && node.index + 1 < len {
            succs.push(StmtId::new(node.method, node.index + 1));
        }
        for target in stmt.branch_targets() {
            let succ = StmtId::new(node.method, target);
            if target < len && !succs.contains(&succ) {
                succs.push(succ);
            }
        }
        succs
    }

    fn is_call_stmt(&self, node: &StmtId) -> bool {
        self.program.stmt(*node).map_or(false, |s| s.is_call())
    }

    fn is_exit_stmt(&self, node: &StmtId) -> bool {
        self.program.stmt(*node).map_or(false, |s| s.is_exit())
    }

    fn callees_of_call_at(&self, node: &StmtId) -> Vec<MethodId> {
        self.program
            .stmt(*node)
            .and_then(|s| s.invoke_expr())
            .and_then(|expr| self.program.resolve(&expr.method))
            .filter(|callee| {
                self.program
                    .method(*callee)
                    .map_or(false, |m| !m.body.is_empty())
            })
            .into_iter()
            .collect()
    }

    fn return_sites_of_call_at(&self, node: &StmtId) -> Vec<StmtId> {
        self.successors_of(node)
    }

    fn start_points_of(&self, method: &MethodId) -> Vec<StmtId> {
        match self.program.method(*method) {
            Some(m) if !m.body.is_empty() => vec![StmtId::new(*method, 0)],
            _ => Vec::new(),
        }
    }
}
