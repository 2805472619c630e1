/*
 * IFDS Tabulation Algorithm (Solver)
 *
 * Worklist-based tabulation from:
 * Reps, Horwitz, Sagiv (1995): "Precise Interprocedural Dataflow Analysis via Graph Reachability"
 *
 * Algorithm Overview:
 * 1. Initialize worklist with seed facts: (ZERO, entry, seed)
 * 2. Pop path edge (d1, n, d2) from worklist
 * 3. Dispatch on n:
 *    - call site: call flow into each callee start point (recording the
 *      incoming edge), apply existing end summaries, then call-to-return
 *    - exit: record end summary (method, d1) → (n, d2), then return flow
 *      to every return site of every recorded incoming call
 *    - otherwise: normal flow to every successor
 * 4. Repeat until worklist empty (fixpoint) or a configured limit is hit
 *
 * The solver only sees the problem through `IFDSProblem` and the program
 * through `InterproceduralCfg`; flow functions may carry side effects of
 * their own (the solver calls them in worklist order, one at a time).
 */

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::time::Instant;

use super::framework::{DataflowFact, IFDSProblem, IFDSStatistics, PathEdge};
use crate::features::ir::ports::InterproceduralCfg;

type Problem<I, F> = Box<
    dyn IFDSProblem<<I as InterproceduralCfg>::Node, <I as InterproceduralCfg>::Method, F>,
>;

/// IFDS Tabulation Solver
///
/// Usage:
/// ```text
/// let solver = IFDSSolver::new(Box::new(problem), icfg);
/// let result = solver.solve();
/// let facts = result.facts_at(&stmt);
/// ```
pub struct IFDSSolver<I: InterproceduralCfg, F: DataflowFact> {
    /// IFDS problem specification
    problem: Problem<I, F>,

    /// Interprocedural control flow graph
    icfg: I,

    /// Path edges: (d1, n) → {d2, d3, ...}
    path_edges: FxHashMap<(F, I::Node), HashSet<F>>,

    /// Incoming calls: (callee, entry fact) → {(call site, caller source fact)}
    incoming: FxHashMap<(I::Method, F), HashSet<(I::Node, F)>>,

    /// End summaries: (method, entry fact) → {(exit node, exit fact)}
    end_summaries: FxHashMap<(I::Method, F), HashSet<(I::Node, F)>>,

    /// Worklist of path edges to process
    worklist: VecDeque<PathEdge<I::Node, F>>,

    num_path_edges: usize,

    /// Statistics
    stats: IFDSStatistics,
}

impl<I, F> IFDSSolver<I, F>
where
    I: InterproceduralCfg,
    F: DataflowFact + 'static,
{
    pub fn new(problem: Problem<I, F>, icfg: I) -> Self {
        Self {
            problem,
            icfg,
            path_edges: FxHashMap::default(),
            incoming: FxHashMap::default(),
            end_summaries: FxHashMap::default(),
            worklist: VecDeque::new(),
            num_path_edges: 0,
            stats: IFDSStatistics::default(),
        }
    }

    /// Solve the IFDS problem to a fixpoint
    pub fn solve(self) -> IFDSSolverResult<I::Node, F> {
        self.solve_with_limits(None, None)
    }

    /// Solve with configurable limits
    ///
    /// The result is partial (`completed == false`) if a limit stopped the
    /// tabulation before the worklist drained.
    pub fn solve_with_limits(
        mut self,
        max_iterations: Option<usize>,
        max_path_edges: Option<usize>,
    ) -> IFDSSolverResult<I::Node, F> {
        let start_time = Instant::now();
        let mut completed = true;

        self.initialize_worklist();

        while let Some(path_edge) = self.worklist.pop_front() {
            let iterations_exhausted =
                max_iterations.map_or(false, |max| self.stats.num_iterations >= max);
            let edges_exhausted = max_path_edges.map_or(false, |max| self.num_path_edges >= max);
            if iterations_exhausted || edges_exhausted {
                tracing::warn!(
                    "IFDS solver stopped early: iterations={}, path_edges={}, pending={}",
                    self.stats.num_iterations,
                    self.num_path_edges,
                    self.worklist.len() + 1
                );
                completed = false;
                break;
            }

            self.stats.num_iterations += 1;
            self.process_path_edge(path_edge);
        }

        self.stats.num_path_edges = self.num_path_edges;
        self.stats.num_end_summaries = self.end_summaries.values().map(|s| s.len()).sum();
        self.stats.analysis_time_ms = start_time.elapsed().as_millis() as u64;

        tracing::debug!(
            "IFDS solver finished: iterations={}, path_edges={}, summaries={}, reuses={}",
            self.stats.num_iterations,
            self.stats.num_path_edges,
            self.stats.num_end_summaries,
            self.stats.num_summary_reuses
        );

        let mut facts_by_node: FxHashMap<I::Node, HashSet<F>> = FxHashMap::default();
        for ((_, node), facts) in &self.path_edges {
            facts_by_node
                .entry(node.clone())
                .or_insert_with(HashSet::new)
                .extend(facts.iter().cloned());
        }

        IFDSSolverResult {
            path_edges: self.path_edges,
            facts_by_node,
            stats: self.stats,
            completed,
        }
    }

    /// Initialize worklist with seed facts
    fn initialize_worklist(&mut self) {
        for (entry_node, seed_fact) in self.problem.initial_seeds() {
            self.propagate(F::zero(), entry_node, seed_fact);
        }
    }

    /// Process a path edge: (d1, n, d2)
    fn process_path_edge(&mut self, path_edge: PathEdge<I::Node, F>) {
        let PathEdge {
            source_fact: d1,
            target_node: n,
            target_fact: d2,
        } = path_edge;

        tracing::trace!("path edge at {:?}", n);

        if self.icfg.is_call_stmt(&n) {
            self.process_call(&d1, &n, &d2);
        } else if self.icfg.is_exit_stmt(&n) {
            self.process_exit(&d1, &n, &d2);
        } else {
            self.process_normal(&d1, &n, &d2);
        }
    }

    /// Normal intra-procedural edges: n → m
    fn process_normal(&mut self, d1: &F, n: &I::Node, d2: &F) {
        for m in self.icfg.successors_of(n) {
            let flow = self.problem.normal_flow(n, &m);
            self.stats.num_flow_applications += 1;
            for d3 in flow.compute(d2) {
                self.propagate(d1.clone(), m.clone(), d3);
            }
        }
    }

    /// Call site: call edges into callees, summary reuse, call-to-return
    fn process_call(&mut self, d1: &F, call_site: &I::Node, d2: &F) {
        let return_sites = self.icfg.return_sites_of_call_at(call_site);

        for callee in self.icfg.callees_of_call_at(call_site) {
            let flow = self.problem.call_flow(call_site, &callee);
            self.stats.num_flow_applications += 1;

            for d3 in flow.compute(d2) {
                for start in self.icfg.start_points_of(&callee) {
                    self.propagate(d3.clone(), start, d3.clone());
                }

                self.incoming
                    .entry((callee.clone(), d3.clone()))
                    .or_insert_with(HashSet::new)
                    .insert((call_site.clone(), d1.clone()));

                // Reuse end summaries already computed for (callee, d3)
                let summaries = self
                    .end_summaries
                    .get(&(callee.clone(), d3.clone()))
                    .cloned()
                    .unwrap_or_default();
                for (exit, d4) in summaries {
                    self.stats.num_summary_reuses += 1;
                    for return_site in &return_sites {
                        let flow = self
                            .problem
                            .return_flow(call_site, &callee, &exit, return_site);
                        self.stats.num_flow_applications += 1;
                        for d5 in flow.compute(&d4) {
                            self.propagate(d1.clone(), return_site.clone(), d5);
                        }
                    }
                }
            }
        }

        for return_site in &return_sites {
            let flow = self.problem.call_to_return_flow(call_site, return_site);
            self.stats.num_flow_applications += 1;
            for d3 in flow.compute(d2) {
                self.propagate(d1.clone(), return_site.clone(), d3);
            }
        }
    }

    /// Exit node: record end summary and return to every known caller
    fn process_exit(&mut self, d1: &F, exit: &I::Node, d2: &F) {
        let method = self.icfg.method_of(exit);

        let is_new = self
            .end_summaries
            .entry((method.clone(), d1.clone()))
            .or_insert_with(HashSet::new)
            .insert((exit.clone(), d2.clone()));
        if !is_new {
            return;
        }

        let callers = self
            .incoming
            .get(&(method.clone(), d1.clone()))
            .cloned()
            .unwrap_or_default();
        for (call_site, caller_source) in callers {
            for return_site in self.icfg.return_sites_of_call_at(&call_site) {
                let flow = self
                    .problem
                    .return_flow(&call_site, &method, exit, &return_site);
                self.stats.num_flow_applications += 1;
                for d5 in flow.compute(d2) {
                    self.propagate(caller_source.clone(), return_site.clone(), d5);
                }
            }
        }
    }

    /// Add path edge to worklist (if new)
    fn propagate(&mut self, source_fact: F, target_node: I::Node, target_fact: F) {
        let facts = self
            .path_edges
            .entry((source_fact.clone(), target_node.clone()))
            .or_insert_with(HashSet::new);

        if facts.insert(target_fact.clone()) {
            self.num_path_edges += 1;
            self.worklist
                .push_back(PathEdge::new(source_fact, target_node, target_fact));
        }
    }
}

/// IFDS Solver Result
pub struct IFDSSolverResult<N, F: DataflowFact> {
    /// Path edges: (d1, n) → {d2, ...}
    pub path_edges: FxHashMap<(F, N), HashSet<F>>,

    /// Facts reaching each node, from any source fact
    facts_by_node: FxHashMap<N, HashSet<F>>,

    /// Statistics
    pub stats: IFDSStatistics,

    /// False if a limit stopped the solver before the fixpoint
    pub completed: bool,
}

impl<N: Clone + Eq + Hash, F: DataflowFact> IFDSSolverResult<N, F> {
    /// Facts reaching `node` from any source fact context
    pub fn facts_at(&self, node: &N) -> HashSet<F> {
        self.facts_by_node.get(node).cloned().unwrap_or_default()
    }

    /// Facts reaching `node` from a specific source fact
    pub fn get_facts_at_node(&self, node: &N, source_fact: &F) -> HashSet<F> {
        self.path_edges
            .get(&(source_fact.clone(), node.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Check if a fact reaches a node (from any source fact context)
    pub fn is_fact_at_node(&self, node: &N, target_fact: &F) -> bool {
        self.facts_by_node
            .get(node)
            .map_or(false, |facts| facts.contains(target_fact))
    }

    /// Nodes reached by at least one fact
    pub fn reached_nodes(&self) -> FxHashSet<N> {
        self.facts_by_node.keys().cloned().collect()
    }

    /// Get number of path edges
    pub fn path_edges_count(&self) -> usize {
        self.path_edges.values().map(|s| s.len()).sum()
    }

    /// Get analysis statistics
    pub fn statistics(&self) -> &IFDSStatistics {
        &self.stats
    }
}
