//! Custom assertions for folding results

use std::collections::HashSet;
use strfold_ir::features::ir::domain::{Local, StmtId};
use strfold_ir::{AbstractValue, Environment, FoldingResult};

/// Assert that every environment reaching `stmt` binds `local` to `text`
pub fn assert_known_at(result: &FoldingResult, stmt: StmtId, local: &str, text: &str) {
    assert_eq!(
        result.value_at(stmt, &Local::new(local)),
        AbstractValue::known(text),
        "{local} at {stmt}; facts: {}",
        describe(&result.facts_at(stmt))
    );
}

/// Assert that `local` at `stmt` does not fold to a single constant
pub fn assert_unknown_at(result: &FoldingResult, stmt: StmtId, local: &str) {
    assert_eq!(
        result.value_at(stmt, &Local::new(local)),
        AbstractValue::Unknown,
        "{local} at {stmt}; facts: {}",
        describe(&result.facts_at(stmt))
    );
}

/// Assert that at least one environment reaching `stmt` binds `local` to `text`
pub fn assert_some_fact_binds(result: &FoldingResult, stmt: StmtId, local: &str, text: &str) {
    let facts = result.facts_at(stmt);
    assert!(
        facts
            .iter()
            .any(|env| env.current(&Local::new(local)) == AbstractValue::known(text)),
        "no fact at {stmt} binds {local}={text:?}; facts: {}",
        describe(&facts)
    );
}

fn describe(facts: &HashSet<Environment>) -> String {
    let mut rendered: Vec<String> = facts.iter().map(|env| env.to_string()).collect();
    rendered.sort();
    rendered.join(" | ")
}
