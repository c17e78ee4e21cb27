mod probability;

pub use probability::{ProbabilityAnalyzer, RiskAssessment, RiskLevel};
