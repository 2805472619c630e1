/*
 * Program Model Ports
 *
 * The interprocedural control-flow graph the tabulation solver walks.
 * Implementations are read-only views over a program model; the solver
 * never mutates them.
 */

use std::fmt::Debug;
use std::hash::Hash;

/// Interprocedural CFG over nodes `Node` (statements) and methods `Method`
pub trait InterproceduralCfg {
    type Node: Clone + Eq + Hash + Debug;
    type Method: Clone + Eq + Hash + Debug;

    /// Method containing `node`
    fn method_of(&self, node: &Self::Node) -> Self::Method;

    /// Intra-procedural successors of `node`
    fn successors_of(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Whether `node` contains an invocation
    fn is_call_stmt(&self, node: &Self::Node) -> bool;

    /// Whether control leaves the method after `node`
    fn is_exit_stmt(&self, node: &Self::Node) -> bool;

    /// Methods with bodies that `node` may invoke
    fn callees_of_call_at(&self, node: &Self::Node) -> Vec<Self::Method>;

    /// Statements where control resumes after the call at `node`
    fn return_sites_of_call_at(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Entry statements of `method`
    fn start_points_of(&self, method: &Self::Method) -> Vec<Self::Node>;
}
