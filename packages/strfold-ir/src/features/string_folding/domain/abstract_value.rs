/*
 * Abstract String Domain
 *
 * Two-level lattice per variable:
 *   Known(text)  - the variable holds exactly `text` on every path seen
 *   Unknown      - top, no statically known value
 *
 * `Unknown` is absorbing under concatenation. The tag is structural, so a
 * program string that happens to read "*" stays `Known("*")`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum AbstractValue {
    Unknown,
    Known(String),
}

impl AbstractValue {
    /// Default binding for declared locals
    pub fn empty() -> Self {
        AbstractValue::Known(String::new())
    }

    pub fn known(text: impl Into<String>) -> Self {
        AbstractValue::Known(text.into())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, AbstractValue::Known(_))
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            AbstractValue::Known(text) => Some(text),
            AbstractValue::Unknown => None,
        }
    }

    /// `Known(a ++ b)` when both sides are known, otherwise `Unknown`
    pub fn concat(&self, other: &AbstractValue) -> AbstractValue {
        match (self, other) {
            (AbstractValue::Known(a), AbstractValue::Known(b)) => {
                let mut text = String::with_capacity(a.len() + b.len());
                text.push_str(a);
                text.push_str(b);
                AbstractValue::Known(text)
            }
            _ => AbstractValue::Unknown,
        }
    }
}

impl Default for AbstractValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for AbstractValue {
    fn from(text: &str) -> Self {
        AbstractValue::Known(text.to_string())
    }
}

impl fmt::Display for AbstractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractValue::Known(text) => write!(f, "{:?}", text),
            AbstractValue::Unknown => f.write_str("*"),
        }
    }
}
