mod evaluator;
mod structure;

pub use evaluator::{HandEvaluation, HandEvaluator, StructureTag};
pub use structure::StructureAnalyzer;
