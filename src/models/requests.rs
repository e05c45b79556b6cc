use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{BuyerCriteria, PropertyListing, PropertyStatus};

/// Request to evaluate an ad-hoc property against an ad-hoc buy box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateMatchRequest {
    pub property: PropertyListing,
    pub buyer: BuyerCriteria,
}

/// Request to record that a property was sent to a buyer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordSentMatchRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "property_id", rename = "propertyId")]
    pub property_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "buyer_id", rename = "buyerId")]
    pub buyer_id: i64,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query parameters shared by the match listing endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchesQuery {
    /// Bypass cached results
    #[serde(default)]
    pub refresh: bool,
}
