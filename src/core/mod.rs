// Core algorithm exports
pub mod address;
pub mod filters;
pub mod location;
pub mod matcher;
pub mod scoring;

pub use address::{parse_address, parse_components, parse_free_text, parse_geocode_value, AddressComponent, AddressInput};
pub use filters::{check_eligibility, is_eligible, BuyerPoolQuery, Ineligibility};
pub use location::location_similarity;
pub use matcher::{MatchResult, MatchSummary, Matcher};
pub use scoring::{calculate_match_score, evaluate_match, meets_minimum_score, MIN_REPORTABLE_SCORE};
