/*
 * Environment: Variable → AbstractValue for one method activation
 *
 * The whole map is a single dataflow fact. Bindings are kept sorted so
 * two environments with the same bindings hash and compare equal, which
 * is what the tabulation solver deduplicates on.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::abstract_value::AbstractValue;
use super::context::CallContext;
use crate::features::ifds::DataflowFact;
use crate::features::ir::domain::{Constant, Immediate, Local};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment {
    context: CallContext,
    bindings: BTreeMap<Local, AbstractValue>,
}

impl Environment {
    pub fn new(context: CallContext) -> Self {
        Self {
            context,
            bindings: BTreeMap::new(),
        }
    }

    /// Every local bound to `Known("")`
    pub fn with_locals<'a>(context: CallContext, locals: impl IntoIterator<Item = &'a Local>) -> Self {
        let mut env = Self::new(context);
        for local in locals {
            env.bindings.insert(local.clone(), AbstractValue::empty());
        }
        env
    }

    pub fn context(&self) -> CallContext {
        self.context
    }

    pub fn get(&self, local: &Local) -> Option<&AbstractValue> {
        self.bindings.get(local)
    }

    /// Current value of `local`, `Unknown` when unbound
    pub fn current(&self, local: &Local) -> AbstractValue {
        self.bindings
            .get(local)
            .cloned()
            .unwrap_or(AbstractValue::Unknown)
    }

    /// Abstract value of an operand: literal text, or the local's current value
    pub fn value_of(&self, operand: &Immediate) -> AbstractValue {
        match operand {
            Immediate::Local(local) => self.current(local),
            Immediate::Constant(Constant::Str(text)) => AbstractValue::Known(text.clone()),
            Immediate::Constant(_) => AbstractValue::Unknown,
        }
    }

    pub fn bind(&mut self, local: Local, value: AbstractValue) {
        self.bindings.insert(local, value);
    }

    pub fn contains(&self, local: &Local) -> bool {
        self.bindings.contains_key(local)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Local, &AbstractValue)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl DataflowFact for Environment {
    fn is_zero(&self) -> bool {
        self.context == CallContext::Entry && self.bindings.is_empty()
    }

    fn zero() -> Self {
        Environment::new(CallContext::Entry)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {{", self.context)?;
        for (i, (local, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", local, value)?;
        }
        f.write_str("}")
    }
}
