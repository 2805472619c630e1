// Vertical slices, leaves first: ir → ifds → string_folding

pub mod ifds;
pub mod ir;
pub mod string_folding;
