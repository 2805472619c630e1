/*
 * IFDS Framework (Interprocedural Finite Distributive Subset Problems)
 *
 * Problem-side contracts for the tabulation solver:
 * - Dataflow facts
 * - Flow functions (D → 2^D) for each edge kind
 * - The problem trait: seeds plus the four flow function builders
 *
 * Edge kinds follow the exploded supergraph of Reps/Horwitz/Sagiv:
 *   normal          n → succ(n)            (intra-procedural)
 *   call            call site → callee start point
 *   return          callee exit → return site
 *   call-to-return  call site → return site (bypasses the callee)
 *
 * References:
 * - Reps, Horwitz, Sagiv (1995): "Precise Interprocedural Dataflow Analysis via Graph Reachability"
 * - Bodden et al. (2012): "Inter-procedural Data-flow Analysis with IFDS/IDE and Soot"
 */

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Dataflow fact (abstract domain element)
pub trait DataflowFact: Clone + Eq + Hash + Debug {
    /// Check if this is the special ZERO fact
    fn is_zero(&self) -> bool;

    /// Create the ZERO fact (source fact of the initial seeds)
    fn zero() -> Self;
}

/// Flow function: D → 2^D
pub trait FlowFunction<F: DataflowFact> {
    /// Compute output facts given input fact
    fn compute(&self, input: &F) -> HashSet<F>;

    /// Check if this flow function is identity (f(d) = {d})
    fn is_identity(&self) -> bool {
        false
    }
}

/// Identity flow function: f(d) = {d}
pub struct IdentityFlowFunction;

impl<F: DataflowFact> FlowFunction<F> for IdentityFlowFunction {
    fn compute(&self, input: &F) -> HashSet<F> {
        HashSet::from([input.clone()])
    }

    fn is_identity(&self) -> bool {
        true
    }
}

/// Kill flow function: f(d) = ∅
pub struct KillFlowFunction;

impl<F: DataflowFact> FlowFunction<F> for KillFlowFunction {
    fn compute(&self, _input: &F) -> HashSet<F> {
        HashSet::new()
    }
}

/// Path edge: (d1, n, d2)
///
/// Fact d2 holds at node n when d1 held at the start point of n's method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathEdge<N, F: DataflowFact> {
    /// Source fact (at procedure entry)
    pub source_fact: F,

    /// Target CFG node
    pub target_node: N,

    /// Target fact (at target_node)
    pub target_fact: F,
}

impl<N, F: DataflowFact> PathEdge<N, F> {
    pub fn new(source_fact: F, target_node: N, target_fact: F) -> Self {
        Self {
            source_fact,
            target_node,
            target_fact,
        }
    }
}

/// IFDS Problem specification over nodes `N`, methods `M` and facts `F`
pub trait IFDSProblem<N, M, F: DataflowFact> {
    /// Initial facts at entry nodes
    fn initial_seeds(&self) -> Vec<(N, F)>;

    /// Normal flow function for the intra-procedural edge `curr → succ`
    fn normal_flow(&self, curr: &N, succ: &N) -> Box<dyn FlowFunction<F>>;

    /// Call flow function from `call_site` into the start points of `callee`
    fn call_flow(&self, call_site: &N, callee: &M) -> Box<dyn FlowFunction<F>>;

    /// Return flow function from `exit_stmt` of `callee` to `return_site`
    fn return_flow(
        &self,
        call_site: &N,
        callee: &M,
        exit_stmt: &N,
        return_site: &N,
    ) -> Box<dyn FlowFunction<F>>;

    /// Call-to-return flow function (bypasses the callee)
    fn call_to_return_flow(&self, call_site: &N, return_site: &N) -> Box<dyn FlowFunction<F>>;
}

/// IFDS Analysis Statistics
#[derive(Debug, Clone, Default)]
pub struct IFDSStatistics {
    /// Number of path edges computed
    pub num_path_edges: usize,

    /// Number of end summaries (method exit facts per entry fact)
    pub num_end_summaries: usize,

    /// Number of end summary reuses at call sites
    /// Higher is better - indicates callee re-analysis was avoided
    pub num_summary_reuses: usize,

    /// Number of flow function applications
    pub num_flow_applications: usize,

    /// Number of worklist iterations
    pub num_iterations: usize,

    /// Analysis time (milliseconds)
    pub analysis_time_ms: u64,
}
