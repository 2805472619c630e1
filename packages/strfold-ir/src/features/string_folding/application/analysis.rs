/*
 * String Folding Analysis (driver)
 *
 * Setup:  entry class + method name → entry MethodId, static initializer
 * Run:    fresh constants table, StringFoldingProblem, tabulation solver
 * Query:  FoldingResult (facts per statement, constants per method, report)
 *
 * One analysis can be run several times; every run owns a fresh table.
 */

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use super::flow_functions::{FoldingOptions, StringFoldingProblem};
use super::interpreter::StringFoldingInterpreter;
use crate::config::StringFoldConfig;
use crate::errors::{Result, StrFoldError};
use crate::features::ifds::{IFDSSolver, IFDSSolverResult, IFDSStatistics};
use crate::features::ir::domain::{Local, MethodId, StmtId};
use crate::features::ir::infrastructure::{Program, ProgramIcfg};
use crate::features::string_folding::domain::{
    AbstractValue, CallContext, Environment, MethodConstantsTable, TableStatistics,
};
use crate::features::string_folding::ports::{
    ContextConstants, FoldingReport, MethodConstants, SolverSummary,
};

/// Entry method name used by `StringFoldingAnalysis::new`
pub const DEFAULT_ENTRY_METHOD: &str = "main";

#[derive(Debug, Clone)]
pub struct StringFoldingAnalysis {
    program: Arc<Program>,
    entry: MethodId,
    clinit: Option<MethodId>,
    config: StringFoldConfig,
}

impl StringFoldingAnalysis {
    /// Analyze `class.main`
    pub fn new(program: Arc<Program>, class: &str, config: StringFoldConfig) -> Result<Self> {
        Self::with_entry(program, class, DEFAULT_ENTRY_METHOD, config)
    }

    pub fn with_entry(
        program: Arc<Program>,
        class: &str,
        method: &str,
        config: StringFoldConfig,
    ) -> Result<Self> {
        config.validate()?;

        if !program.has_class(class) {
            tracing::debug!("entry class {} is not part of the program", class);
            return Err(StrFoldError::ClassNotFound(class.to_string()));
        }

        let entry = program.find_method(class, method).ok_or_else(|| {
            tracing::debug!("class {} has no method {}", class, method);
            StrFoldError::EntryMethodNotFound {
                class: class.to_string(),
                method: method.to_string(),
            }
        })?;

        if program.method(entry).map_or(true, |m| m.body.is_empty()) {
            tracing::debug!("entry method {} has no body", program.describe(entry));
            return Err(StrFoldError::EmptyMethodBody(program.describe(entry)));
        }

        let clinit = if config.resolve_static_fields {
            program.static_initializer(class)
        } else {
            None
        };
        if clinit.is_none() && config.require_static_initializer {
            tracing::debug!("class {} has no static initializer", class);
            return Err(StrFoldError::StaticInitializerNotFound {
                class: class.to_string(),
            });
        }

        Ok(Self {
            program,
            entry,
            clinit,
            config,
        })
    }

    pub fn entry(&self) -> MethodId {
        self.entry
    }

    pub fn static_initializer(&self) -> Option<MethodId> {
        self.clinit
    }

    pub fn config(&self) -> &StringFoldConfig {
        &self.config
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// Run the tabulation to a fixed point (or the configured limits)
    pub fn run(&self) -> Result<FoldingResult> {
        tracing::info!(
            "string folding: entry={} mode={:?} methods={}",
            self.program.describe(self.entry),
            self.config.table_mode,
            self.program.num_methods()
        );

        let table = MethodConstantsTable::shared(self.config.table_mode);
        let interpreter =
            StringFoldingInterpreter::new(Arc::new(self.config.primitive_registry()));
        let options = FoldingOptions {
            bind_literal_arguments: self.config.bind_literal_arguments,
            resolve_static_fields: self.config.resolve_static_fields,
        };
        let problem = StringFoldingProblem::new(
            Arc::clone(&self.program),
            self.entry,
            self.clinit,
            interpreter,
            Rc::clone(&table),
            options,
        );

        let solver = IFDSSolver::new(Box::new(problem), ProgramIcfg::new(Arc::clone(&self.program)));
        let solved = solver.solve_with_limits(self.config.max_iterations, self.config.max_path_edges);

        if !solved.completed && self.config.fail_on_limit {
            return Err(StrFoldError::SolverIncomplete {
                iterations: solved.stats.num_iterations,
                path_edges: solved.stats.num_path_edges,
            });
        }

        // The problem (and with it every other handle) was dropped by the solver
        let table = Rc::try_unwrap(table)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.borrow().clone());

        let stats = table.statistics();
        tracing::info!(
            "string folding finished: completed={} iterations={} path_edges={} writes={} returns_linked={} missing_caller_contexts={}",
            solved.completed,
            solved.stats.num_iterations,
            solved.stats.num_path_edges,
            stats.writes,
            stats.returns_linked,
            stats.missing_caller_contexts
        );

        Ok(FoldingResult {
            program: Arc::clone(&self.program),
            entry: self.entry,
            solved,
            table,
        })
    }
}

/// Outcome of one run
pub struct FoldingResult {
    program: Arc<Program>,
    entry: MethodId,
    solved: IFDSSolverResult<StmtId, Environment>,
    table: MethodConstantsTable,
}

impl FoldingResult {
    /// Latest environment per method
    pub fn method_constants(&self) -> &FxHashMap<MethodId, Environment> {
        self.table.method_constants()
    }

    pub fn constants_of(&self, method: MethodId) -> Option<&Environment> {
        self.table.latest(method)
    }

    /// Environments of `method` per call context
    pub fn contexts_of(&self, method: MethodId) -> Vec<(CallContext, &Environment)> {
        self.table.contexts_of(method)
    }

    /// Environments reaching `stmt` (before it executes)
    pub fn facts_at(&self, stmt: StmtId) -> HashSet<Environment> {
        self.solved.facts_at(&stmt)
    }

    /// Value of `local` at `stmt` if every reaching environment agrees
    pub fn value_at(&self, stmt: StmtId, local: &Local) -> AbstractValue {
        let facts = self.solved.facts_at(&stmt);
        let mut values = facts.iter().map(|env| env.current(local));
        let Some(first) = values.next() else {
            return AbstractValue::Unknown;
        };
        if values.all(|value| value == first) {
            first
        } else {
            AbstractValue::Unknown
        }
    }

    /// Environments reaching the entry method's last statement
    pub fn facts_at_last_statement(&self) -> HashSet<Environment> {
        match self.program.method(self.entry) {
            Some(method) if !method.body.is_empty() => {
                self.facts_at(StmtId::new(self.entry, method.body.len() - 1))
            }
            _ => HashSet::new(),
        }
    }

    pub fn entry(&self) -> MethodId {
        self.entry
    }

    /// False if a solver limit stopped the run early
    pub fn completed(&self) -> bool {
        self.solved.completed
    }

    pub fn solver_statistics(&self) -> &IFDSStatistics {
        self.solved.statistics()
    }

    pub fn table_statistics(&self) -> &TableStatistics {
        self.table.statistics()
    }

    pub fn report(&self) -> FoldingReport {
        let mut methods: Vec<MethodConstants> = self
            .table
            .method_constants()
            .iter()
            .map(|(method, latest)| MethodConstants {
                method: self.program.describe(*method),
                constants: render(latest),
                contexts: self
                    .table
                    .contexts_of(*method)
                    .into_iter()
                    .map(|(context, env)| ContextConstants {
                        context: context.to_string(),
                        constants: render(env),
                    })
                    .collect(),
            })
            .collect();
        methods.sort_by(|a, b| a.method.cmp(&b.method));

        let stats = self.solved.statistics();
        FoldingReport {
            entry: self.program.describe(self.entry),
            completed: self.solved.completed,
            methods,
            solver: SolverSummary {
                iterations: stats.num_iterations,
                path_edges: stats.num_path_edges,
                end_summaries: stats.num_end_summaries,
                summary_reuses: stats.num_summary_reuses,
                flow_applications: stats.num_flow_applications,
                analysis_time_ms: stats.analysis_time_ms,
            },
            table: self.table.statistics().clone(),
        }
    }
}

fn render(env: &Environment) -> BTreeMap<String, AbstractValue> {
    env.iter()
        .map(|(local, value)| (local.name().to_string(), value.clone()))
        .collect()
}
