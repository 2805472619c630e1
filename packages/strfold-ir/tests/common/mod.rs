//! Common test utilities for strfold-ir
//!
//! Program fixtures for the folding scenarios and assertions over
//! `FoldingResult`.

#![allow(dead_code)]

mod assertions;
mod builders;

pub use assertions::*;
pub use builders::*;
