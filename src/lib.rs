//! landmatch - buyer/property matching service for land deals
//!
//! Scores seller property submissions against buyers' acquisition criteria
//! ("buy boxes") with a fixed weighted policy, then ranks and buckets the
//! results into Good, Marginal and Poor fit.

pub mod config;
pub mod core;
pub mod models;
pub mod presenter;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, evaluate_match, location_similarity, parse_address, MatchResult, Matcher};
pub use models::{BuyerCriteria, FitCategory, MatchEvaluation, PropertyListing, ScoringWeights};
