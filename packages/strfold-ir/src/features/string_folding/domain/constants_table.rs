/*
 * Method Constants Table
 *
 * Side table written by every flow function and read by the return flow
 * function to patch the caller's environment after a call.
 *
 * Storage is an arena keyed by (call context, method):
 *   PerCallSite - a callee activation is keyed by the call site that
 *                 created it; each context remembers the caller context it
 *                 was entered from, so a return finds the right caller
 *                 environment even when the callee has several call sites.
 *   PerMethod   - every activation shares one key per method
 *                 (last write wins across call sites).
 *
 * Contexts are one call site deep. A recursive call re-entering a method
 * through the site it was already entered at reuses that context: every
 * nesting level shares one environment and one parent, so an inner return
 * links into the outermost caller rather than the enclosing activation.
 *
 * A per-method "latest" view (last write across all contexts) is kept for
 * report consumers.
 *
 * Single writer: the table is shared between flow functions through
 * `Rc<RefCell<_>>` and is not meant to cross threads.
 */

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use super::abstract_value::AbstractValue;
use super::context::CallContext;
use super::environment::Environment;
use crate::features::ir::domain::{Local, MethodId, StmtId};

/// Shared handle used by the flow functions of one analysis run
pub type SharedConstantsTable = Rc<RefCell<MethodConstantsTable>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    PerMethod,
    #[default]
    PerCallSite,
}

/// Outcome of stitching a returned value into the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLink {
    /// Caller environment with the call's destination bound
    Linked(Environment),

    /// No caller environment recorded for this activation
    MissingCallerContext {
        callee_context: CallContext,
        caller: MethodId,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableStatistics {
    pub writes: usize,
    pub returns_linked: usize,
    pub missing_caller_contexts: usize,
}

#[derive(Debug, Clone)]
pub struct MethodConstantsTable {
    mode: TableMode,
    environments: FxHashMap<(CallContext, MethodId), Environment>,
    parents: FxHashMap<CallContext, CallContext>,
    latest: FxHashMap<MethodId, Environment>,
    stats: TableStatistics,
}

impl MethodConstantsTable {
    pub fn new(mode: TableMode) -> Self {
        Self {
            mode,
            environments: FxHashMap::default(),
            parents: FxHashMap::default(),
            latest: FxHashMap::default(),
            stats: TableStatistics::default(),
        }
    }

    pub fn shared(mode: TableMode) -> SharedConstantsTable {
        Rc::new(RefCell::new(Self::new(mode)))
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    /// Context for the callee activation created at `call_site`
    pub fn callee_context(&self, call_site: StmtId) -> CallContext {
        match self.mode {
            TableMode::PerMethod => CallContext::Global,
            TableMode::PerCallSite => CallContext::CallSite(call_site),
        }
    }

    /// Store `env` as the current environment of `method` in its context
    pub fn record(&mut self, method: MethodId, env: Environment) {
        let key = (self.storage_context(env.context()), method);
        tracing::trace!("constants[{} @ {}] <- {}", method, key.0, env);
        self.stats.writes += 1;
        self.latest.insert(method, env.clone());
        self.environments.insert(key, env);
    }

    /// Store a freshly created callee environment entered from `caller_context`
    ///
    /// Re-entry from the callee's own context keeps the existing parent.
    pub fn enter(&mut self, callee: MethodId, caller_context: CallContext, env: Environment) {
        let callee_context = env.context();
        if callee_context != caller_context {
            self.parents.insert(callee_context, caller_context);
        }
        self.record(callee, env);
    }

    pub fn get(&self, context: CallContext, method: MethodId) -> Option<&Environment> {
        self.environments
            .get(&(self.storage_context(context), method))
    }

    /// Last environment written for `method` in any context
    pub fn latest(&self, method: MethodId) -> Option<&Environment> {
        self.latest.get(&method)
    }

    /// Caller context recorded for a callee context
    pub fn parent_of(&self, context: CallContext) -> Option<CallContext> {
        match self.mode {
            TableMode::PerMethod => Some(CallContext::Global),
            TableMode::PerCallSite => self.parents.get(&context).copied(),
        }
    }

    /// Bind `dest` in the caller's environment to the returned value
    ///
    /// The caller environment is found through the callee's context; it is
    /// mutated in place and a copy is returned for propagation.
    pub fn bind_return(
        &mut self,
        callee_context: CallContext,
        caller: MethodId,
        dest: &Local,
        value: AbstractValue,
    ) -> ReturnLink {
        let missing = ReturnLink::MissingCallerContext {
            callee_context,
            caller,
        };
        let Some(caller_context) = self.parent_of(callee_context) else {
            self.stats.missing_caller_contexts += 1;
            return missing;
        };
        let key = (self.storage_context(caller_context), caller);
        let Some(env) = self.environments.get_mut(&key) else {
            self.stats.missing_caller_contexts += 1;
            return missing;
        };

        env.bind(dest.clone(), value);
        let linked = env.clone();
        self.stats.returns_linked += 1;
        self.latest.insert(caller, linked.clone());
        ReturnLink::Linked(linked)
    }

    /// Latest environment per method
    pub fn method_constants(&self) -> &FxHashMap<MethodId, Environment> {
        &self.latest
    }

    /// Every stored (context, environment) pair for `method`, sorted by context
    pub fn contexts_of(&self, method: MethodId) -> Vec<(CallContext, &Environment)> {
        let mut contexts: Vec<_> = self
            .environments
            .iter()
            .filter(|((_, m), _)| *m == method)
            .map(|((ctx, _), env)| (*ctx, env))
            .collect();
        contexts.sort_by_key(|(ctx, _)| *ctx);
        contexts
    }

    pub fn statistics(&self) -> &TableStatistics {
        &self.stats
    }

    fn storage_context(&self, context: CallContext) -> CallContext {
        match self.mode {
            TableMode::PerMethod => CallContext::Global,
            TableMode::PerCallSite => context,
        }
    }
}
