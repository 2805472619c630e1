/*
 * String Folding Flow Functions
 *
 * IFDSProblem over StmtId / MethodId / Environment. The whole environment
 * of one activation is the dataflow fact, so every flow function maps one
 * environment to at most one environment.
 *
 * Edge kinds:
 *   normal          defining statement → interpret, record, propagate
 *                   anything else      → identity
 *   call            fresh callee environment with parameters bound from
 *                   the actuals; caller and callee recorded in the table
 *   return          `x = call(..)` + `return v` → bind x in the caller
 *                   environment found through the constants table
 *                   otherwise → kill
 *   call-to-return  interpret the call statement locally, record, propagate
 *
 * Every flow function writes the method constants table; the solver calls
 * them one at a time so the shared RefCell is never borrowed twice.
 */

use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use super::interpreter::StringFoldingInterpreter;
use crate::features::ifds::{FlowFunction, IFDSProblem, IdentityFlowFunction, KillFlowFunction};
use crate::features::ir::domain::{Immediate, Local, Method, MethodId, Place, Stmt, StmtId};
use crate::features::ir::infrastructure::Program;
use crate::features::string_folding::domain::{
    AbstractValue, CallContext, Environment, ReturnLink, SharedConstantsTable,
};

/// Knobs of the flow functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldingOptions {
    /// Bind string literal actuals to the callee parameter (`foo("hi")`)
    pub bind_literal_arguments: bool,

    /// Resolve static field reads through the static initializer
    pub resolve_static_fields: bool,
}

impl Default for FoldingOptions {
    fn default() -> Self {
        Self {
            bind_literal_arguments: true,
            resolve_static_fields: true,
        }
    }
}

/// State shared by the problem and every flow function it hands out
struct FoldingState {
    program: Arc<Program>,
    interpreter: StringFoldingInterpreter,
    clinit: Option<MethodId>,
    table: SharedConstantsTable,
    options: FoldingOptions,
}

impl FoldingState {
    fn stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.program.stmt(id)
    }

    fn clinit(&self) -> Option<&Method> {
        if !self.options.resolve_static_fields {
            return None;
        }
        self.clinit.and_then(|id| self.program.method(id))
    }

    /// Interpret the statement at `at`, record the result for its method
    fn step(&self, env_in: &Environment, at: StmtId) -> Environment {
        let env_out = match self.stmt(at) {
            Some(stmt) => self.interpreter.interpret(env_in, stmt, self.clinit()),
            None => env_in.clone(),
        };
        self.table.borrow_mut().record(at.method, env_out.clone());
        env_out
    }
}

pub struct StringFoldingProblem {
    entry: MethodId,
    state: Rc<FoldingState>,
}

impl StringFoldingProblem {
    pub fn new(
        program: Arc<Program>,
        entry: MethodId,
        clinit: Option<MethodId>,
        interpreter: StringFoldingInterpreter,
        table: SharedConstantsTable,
        options: FoldingOptions,
    ) -> Self {
        Self {
            entry,
            state: Rc::new(FoldingState {
                program,
                interpreter,
                clinit,
                table,
                options,
            }),
        }
    }

    pub fn entry(&self) -> MethodId {
        self.entry
    }

    pub fn table(&self) -> &SharedConstantsTable {
        &self.state.table
    }
}

impl IFDSProblem<StmtId, MethodId, Environment> for StringFoldingProblem {
    fn initial_seeds(&self) -> Vec<(StmtId, Environment)> {
        let Some(method) = self.state.program.method(self.entry) else {
            return Vec::new();
        };
        if method.body.is_empty() {
            return Vec::new();
        }
        let env = Environment::with_locals(CallContext::Entry, &method.locals);
        vec![(StmtId::new(self.entry, 0), env)]
    }

    fn normal_flow(&self, curr: &StmtId, _succ: &StmtId) -> Box<dyn FlowFunction<Environment>> {
        let defines_local = self
            .state
            .stmt(*curr)
            .map_or(false, |stmt| stmt.defined_local().is_some());
        if !defines_local {
            return Box::new(IdentityFlowFunction);
        }
        Box::new(NormalFlow {
            at: *curr,
            state: Rc::clone(&self.state),
        })
    }

    fn call_flow(&self, call_site: &StmtId, callee: &MethodId) -> Box<dyn FlowFunction<Environment>> {
        let Some(expr) = self.state.stmt(*call_site).and_then(|s| s.invoke_expr()) else {
            return Box::new(KillFlowFunction);
        };
        let Some(method) = self.state.program.method(*callee) else {
            return Box::new(KillFlowFunction);
        };

        let callee_context = self.state.table.borrow().callee_context(*call_site);
        let bindings = method
            .parameters
            .iter()
            .zip(expr.args.iter())
            .map(|(param, actual)| (param.clone(), actual.clone()))
            .collect();

        Box::new(CallFlow {
            call_site: *call_site,
            callee: *callee,
            callee_context,
            callee_locals: method.locals.clone(),
            bindings,
            state: Rc::clone(&self.state),
        })
    }

    fn return_flow(
        &self,
        call_site: &StmtId,
        callee: &MethodId,
        exit_stmt: &StmtId,
        _return_site: &StmtId,
    ) -> Box<dyn FlowFunction<Environment>> {
        let dest = match self.state.stmt(*call_site) {
            Some(Stmt::Assign {
                lhs: Place::Local(dest),
                rhs,
            }) if rhs.as_invoke().is_some() => dest.clone(),
            _ => {
                tracing::trace!("return {} -> {}: call result unused, kill", callee, call_site);
                return Box::new(KillFlowFunction);
            }
        };
        let returned = match self.state.stmt(*exit_stmt) {
            Some(Stmt::Return(op)) => op.clone(),
            _ => {
                tracing::trace!("return {} -> {}: no returned value, kill", callee, call_site);
                return Box::new(KillFlowFunction);
            }
        };

        Box::new(ReturnFlow {
            caller: call_site.method,
            dest,
            returned,
            state: Rc::clone(&self.state),
        })
    }

    fn call_to_return_flow(
        &self,
        call_site: &StmtId,
        _return_site: &StmtId,
    ) -> Box<dyn FlowFunction<Environment>> {
        Box::new(CallToReturnFlow {
            at: *call_site,
            state: Rc::clone(&self.state),
        })
    }
}

struct NormalFlow {
    at: StmtId,
    state: Rc<FoldingState>,
}

impl FlowFunction<Environment> for NormalFlow {
    fn compute(&self, input: &Environment) -> HashSet<Environment> {
        let env_out = self.state.step(input, self.at);
        tracing::trace!("normal {}: {}", self.at, env_out);
        HashSet::from([env_out])
    }
}

struct CallFlow {
    call_site: StmtId,
    callee: MethodId,
    callee_context: CallContext,
    callee_locals: Vec<Local>,

    /// (formal parameter, actual argument) in positional order
    bindings: Vec<(Local, Immediate)>,

    state: Rc<FoldingState>,
}

impl FlowFunction<Environment> for CallFlow {
    fn compute(&self, input: &Environment) -> HashSet<Environment> {
        let mut env = Environment::with_locals(self.callee_context, &self.callee_locals);
        for (param, actual) in &self.bindings {
            match actual {
                Immediate::Local(local) => env.bind(param.clone(), input.current(local)),
                Immediate::Constant(_) if self.state.options.bind_literal_arguments => {
                    env.bind(param.clone(), input.value_of(actual))
                }
                Immediate::Constant(_) => {}
            }
        }

        let mut table = self.state.table.borrow_mut();
        table.record(self.call_site.method, input.clone());
        table.enter(self.callee, input.context(), env.clone());
        tracing::trace!("call {} -> {}: {}", self.call_site, self.callee, env);

        HashSet::from([env])
    }
}

struct ReturnFlow {
    caller: MethodId,
    dest: Local,
    returned: Immediate,
    state: Rc<FoldingState>,
}

impl FlowFunction<Environment> for ReturnFlow {
    fn compute(&self, input: &Environment) -> HashSet<Environment> {
        let value = input.value_of(&self.returned);
        let link = self.state.table.borrow_mut().bind_return(
            input.context(),
            self.caller,
            &self.dest,
            value,
        );

        match link {
            ReturnLink::Linked(env) => {
                tracing::trace!("return into {}: {}", self.caller, env);
                HashSet::from([env])
            }
            ReturnLink::MissingCallerContext {
                callee_context,
                caller,
            } => {
                tracing::warn!(
                    "no caller environment for {} entered at {}; dropping returned value of {}",
                    caller,
                    callee_context,
                    self.dest
                );
                HashSet::new()
            }
        }
    }
}

struct CallToReturnFlow {
    at: StmtId,
    state: Rc<FoldingState>,
}

impl FlowFunction<Environment> for CallToReturnFlow {
    fn compute(&self, input: &Environment) -> HashSet<Environment> {
        let env_out = self.state.step(input, self.at);
        tracing::trace!("call-to-return {}: {}", self.at, env_out);
        HashSet::from([env_out])
    }
}
