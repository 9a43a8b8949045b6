mod rating;
mod scoring;

pub use rating::RatingStrategy;
pub use scoring::ScoringEngine;
