use std::collections::HashMap;

use crate::core::{calculate_match_score, check_eligibility, meets_minimum_score, MatchResult};
use crate::models::{
    AssetType, BuyBoxFilterView, BuyerCriteria, BuyerMatchView, BuyerMatchesResponse, EvaluateMatchResponse,
    ExitStrategy, LotSizeUnit, MatchEvaluation, PropertyListing, PropertyMatchView, PropertyMatchesResponse,
    PropertyStatus,
};

/// Display labels for stored choice values
pub static EXIT_STRATEGY_LABELS: &[(&str, &str)] = &[
    ("infill", "Infill Lot Development"),
    ("flip", "Buy & Flip"),
    ("subdivide", "Subdivide & Sell"),
    ("seller_financing", "Seller Financing"),
    ("rezoning", "Entitlement/Rezoning"),
    ("mobile_home", "Mobile Home Lot"),
];

pub static ASSET_TYPE_LABELS: &[(&str, &str)] = &[("land", "Land"), ("houses", "Houses"), ("both", "Both")];

pub static PROPERTY_STATUS_LABELS: &[(&str, &str)] = &[
    ("submitted", "Submitted"),
    ("under_review_with_buyer", "Under review with Buyer"),
    ("buyer_approved", "Buyer Approved"),
    ("buyer_rejected", "Buyer Rejected"),
    ("mls_pending", "MLS Listing - Pending"),
    ("mls_active", "MLS Active Listing"),
    ("sold", "Sold Deal"),
    ("canceled", "Canceled Deal"),
];

pub static LOT_SIZE_UNIT_LABELS: &[(&str, &str)] = &[("acres", "Acres"), ("sqft", "Square Feet")];

fn lookup<'a>(table: &[(&'a str, &'a str)], value: &'a str) -> &'a str {
    table
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Turns engine results into the admin and buyer payloads
///
/// Label lookups happen here so the scoring core only ever sees stored values.
#[derive(Debug, Clone)]
pub struct MatchPresenter {
    exit_strategies: &'static [(&'static str, &'static str)],
    asset_types: &'static [(&'static str, &'static str)],
    statuses: &'static [(&'static str, &'static str)],
    lot_size_units: &'static [(&'static str, &'static str)],
}

impl Default for MatchPresenter {
    fn default() -> Self {
        Self {
            exit_strategies: EXIT_STRATEGY_LABELS,
            asset_types: ASSET_TYPE_LABELS,
            statuses: PROPERTY_STATUS_LABELS,
            lot_size_units: LOT_SIZE_UNIT_LABELS,
        }
    }
}

impl MatchPresenter {
    pub fn exit_strategy_label<'a>(&self, strategy: &'a ExitStrategy) -> &'a str {
        match strategy {
            // free-form values are shown as entered
            ExitStrategy::Other(value) => value,
            known => lookup(self.exit_strategies, known.as_str()),
        }
    }

    pub fn asset_type_label(&self, asset_type: AssetType) -> &'static str {
        lookup(self.asset_types, asset_type.as_str())
    }

    pub fn status_label(&self, status: PropertyStatus) -> &'static str {
        lookup(self.statuses, status.as_str())
    }

    pub fn lot_size_label(&self, size: f64, unit: LotSizeUnit) -> String {
        format!("{} {}", size, lookup(self.lot_size_units, unit.as_str()))
    }

    /// Admin view: every buyer matched to one property, categorized
    pub fn property_matches(
        &self,
        property: &PropertyListing,
        result: &MatchResult,
        buyers: &[BuyerCriteria],
    ) -> PropertyMatchesResponse {
        let by_id: HashMap<i64, &BuyerCriteria> = buyers.iter().map(|b| (b.buyer_id, b)).collect();
        let view = |matches: &[MatchEvaluation]| -> Vec<BuyerMatchView> {
            matches
                .iter()
                .filter_map(|m| by_id.get(&m.buyer_id).map(|buyer| self.buyer_view(buyer, m)))
                .collect()
        };

        PropertyMatchesResponse {
            property_id: property.id,
            good_fit: view(&result.good_fit),
            marginal_fit: view(&result.marginal_fit),
            poor_fit: view(&result.poor_fit),
            summary: result.summary,
        }
    }

    /// Buyer view: every property matched to one buy box, categorized
    pub fn buyer_matches(
        &self,
        buyer: &BuyerCriteria,
        result: &MatchResult,
        properties: &[PropertyListing],
    ) -> BuyerMatchesResponse {
        let by_id: HashMap<i64, &PropertyListing> = properties.iter().map(|p| (p.id, p)).collect();
        let view = |matches: &[MatchEvaluation]| -> Vec<PropertyMatchView> {
            matches
                .iter()
                .filter_map(|m| by_id.get(&m.property_id).map(|property| self.property_view(property, m)))
                .collect()
        };

        BuyerMatchesResponse {
            buyer_id: buyer.buyer_id,
            good_fit: view(&result.good_fit),
            marginal_fit: view(&result.marginal_fit),
            poor_fit: view(&result.poor_fit),
            summary: result.summary,
        }
    }

    /// Inline evaluation of one pair, with the ineligibility reason when gated
    pub fn evaluation(&self, property: &PropertyListing, buyer: &BuyerCriteria) -> EvaluateMatchResponse {
        if let Err(reason) = check_eligibility(buyer, property.kind) {
            return EvaluateMatchResponse {
                eligible: false,
                reported: false,
                reason: Some(reason.to_string()),
                evaluation: None,
            };
        }

        let evaluation = calculate_match_score(property, buyer);
        let reported = meets_minimum_score(evaluation.score);

        EvaluateMatchResponse {
            eligible: true,
            reported,
            reason: (!reported).then(|| "score below reporting floor".to_string()),
            evaluation: Some(evaluation),
        }
    }

    fn buyer_view(&self, buyer: &BuyerCriteria, evaluation: &MatchEvaluation) -> BuyerMatchView {
        BuyerMatchView {
            buyer_id: buyer.buyer_id,
            name: buyer.buyer_name.clone(),
            asset_type: self.asset_type_label(buyer.asset_type).to_string(),
            buybox_filters: BuyBoxFilterView {
                lot_size_min: buyer.lot_size.min,
                lot_size_max: buyer.lot_size.max,
                price_min: buyer.price.min,
                price_max: buyer.price.max,
                zoning: buyer.zoning.iter().cloned().collect(),
            },
            match_score: round2(evaluation.score),
            category: evaluation.category.label().to_string(),
            explanations: evaluation.explanations(),
            components: evaluation.components.clone(),
        }
    }

    fn property_view(&self, property: &PropertyListing, evaluation: &MatchEvaluation) -> PropertyMatchView {
        PropertyMatchView {
            property_id: property.id,
            address: property.address.clone(),
            land_type: property.land_type.as_ref().map(|t| t.as_str().to_string()),
            lot_size: property
                .lot_size
                .map(|size| self.lot_size_label(size, property.lot_size_unit)),
            agreed_price: property.agreed_price,
            exit_strategy: property
                .exit_strategy
                .as_ref()
                .map(|s| self.exit_strategy_label(s).to_string()),
            status: self.status_label(property.status).to_string(),
            match_score: round2(evaluation.score),
            category: evaluation.category.label().to_string(),
            explanations: evaluation.explanations(),
        }
    }
}
