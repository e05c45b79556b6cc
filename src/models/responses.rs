use serde::{Deserialize, Serialize};

use crate::core::MatchSummary;
use crate::models::domain::{ComponentScore, DealLogEntry, MatchEvaluation};

/// Buy box fields echoed back to admins next to a match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBoxFilterView {
    pub lot_size_min: Option<f64>,
    pub lot_size_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub zoning: Vec<String>,
}

/// One buyer matched to a property (admin view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerMatchView {
    pub buyer_id: i64,
    pub name: Option<String>,
    pub asset_type: String,
    pub buybox_filters: BuyBoxFilterView,
    pub match_score: f64,
    pub category: String,
    pub explanations: Vec<String>,
    pub components: Vec<ComponentScore>,
}

/// One property matched to a buy box (buyer view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMatchView {
    pub property_id: i64,
    pub address: String,
    pub land_type: Option<String>,
    pub lot_size: Option<String>,
    pub agreed_price: Option<f64>,
    pub exit_strategy: Option<String>,
    pub status: String,
    pub match_score: f64,
    pub category: String,
    pub explanations: Vec<String>,
}

/// Response for the admin property matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMatchesResponse {
    pub property_id: i64,
    pub good_fit: Vec<BuyerMatchView>,
    pub marginal_fit: Vec<BuyerMatchView>,
    pub poor_fit: Vec<BuyerMatchView>,
    pub summary: MatchSummary,
}

/// Response for the buyer matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerMatchesResponse {
    pub buyer_id: i64,
    pub good_fit: Vec<PropertyMatchView>,
    pub marginal_fit: Vec<PropertyMatchView>,
    pub poor_fit: Vec<PropertyMatchView>,
    pub summary: MatchSummary,
}

/// Response for inline evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateMatchResponse {
    pub eligible: bool,
    pub reported: bool,
    pub reason: Option<String>,
    pub evaluation: Option<MatchEvaluation>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record sent match response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSentMatchResponse {
    pub success: bool,
    pub deal_log_id: uuid::Uuid,
    pub match_score: Option<f64>,
    pub crm_synced: bool,
}

/// Deal log listing for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealLogResponse {
    pub property_id: i64,
    pub entries: Vec<DealLogEntry>,
}
