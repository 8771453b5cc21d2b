pub mod types;
pub mod generator;
pub mod formatters;

pub use types::{
    AvailabilityExplanation, RecommendationTier, TherapeuticExplanation, ToxicityWarning,
};

pub use generator::ExplanationGenerator;
pub use formatters::{JsonFormatter, MarkdownFormatter};
