use crate::core::{
    filters::{check_eligibility, exit_strategy_score, land_type_score, lot_size_score, price_score},
    location::location_similarity,
};
use crate::models::{
    BuyerCriteria, ComponentScore, FitCategory, MatchComponent, MatchEvaluation, PropertyListing,
};

/// Totals below this are noise from buyers with no overlapping criteria
pub const MIN_REPORTABLE_SCORE: f64 = 1.0;

#[inline]
pub fn meets_minimum_score(score: f64) -> bool {
    score >= MIN_REPORTABLE_SCORE
}

/// Evaluate one buyer against one property.
///
/// Returns `None` when the buyer is ineligible (inactive, blacklisted or the
/// wrong asset type) or when the total falls under the reporting floor.
/// Callers that need to tell those apart use `check_eligibility` and
/// `calculate_match_score` directly.
pub fn evaluate_match(property: &PropertyListing, buyer: &BuyerCriteria) -> Option<MatchEvaluation> {
    if let Err(reason) = check_eligibility(buyer, property.kind) {
        tracing::trace!(buyer_id = buyer.buyer_id, property_id = property.id, %reason, "buyer ineligible");
        return None;
    }
    reportable_match(property, buyer)
}

/// Score an already-eligible pair and apply the reporting floor
pub(crate) fn reportable_match(property: &PropertyListing, buyer: &BuyerCriteria) -> Option<MatchEvaluation> {
    let evaluation = calculate_match_score(property, buyer);
    if meets_minimum_score(evaluation.score) {
        Some(evaluation)
    } else {
        tracing::trace!(
            buyer_id = buyer.buyer_id,
            property_id = property.id,
            score = evaluation.score,
            "match below reporting floor"
        );
        None
    }
}

/// Calculate the weighted match score (0-100) for a property and buy box
///
/// Scoring formula (weights are fixed policy):
/// score = (
///     location      * 40 +    # structured components, token fallback
///     land_type     * 30 +    # membership in desired land types
///     exit_strategy * 20 +    # substring containment either way
///     lot_size      *  5 +    # acres within [min, max]
///     price         *  5      # agreed price within [min, max]
/// )
///
/// No eligibility gate and no floor are applied here.
pub fn calculate_match_score(property: &PropertyListing, buyer: &BuyerCriteria) -> MatchEvaluation {
    let (location_score, location_detail) = location_similarity(
        buyer.preferred_location.as_deref(),
        Some(property.address.as_str()),
    );

    let land_type = land_type_score(property.land_type.as_ref(), &buyer.land_property_types);
    let exit_strategy = exit_strategy_score(property.exit_strategy.as_ref(), &buyer.land_strategies);
    let lot_size_acres = property.lot_size_acres();
    let lot_size = lot_size_score(lot_size_acres, &buyer.lot_size);
    let price = price_score(property.agreed_price, &buyer.price);

    let components = vec![
        component(MatchComponent::Location, location_score, location_detail.to_string()),
        component(
            MatchComponent::LandType,
            land_type,
            describe_value(property.land_type.as_ref().map(|lt| lt.as_str()), land_type),
        ),
        component(
            MatchComponent::ExitStrategy,
            exit_strategy,
            describe_value(property.exit_strategy.as_ref().map(|s| s.as_str()), exit_strategy),
        ),
        component(
            MatchComponent::LotSize,
            lot_size,
            describe_value(lot_size_acres.map(|a| format!("{:.2} acres", a)).as_deref(), lot_size),
        ),
        component(
            MatchComponent::Price,
            price,
            describe_value(property.agreed_price.map(|p| format!("${:.2}", p)).as_deref(), price),
        ),
    ];

    let score: f64 = components.iter().map(|c| c.contribution).sum();
    let category = FitCategory::from_score(score);

    tracing::debug!(
        buyer_id = buyer.buyer_id,
        property_id = property.id,
        score,
        category = category.label(),
        "computed match score"
    );

    MatchEvaluation {
        buyer_id: buyer.buyer_id,
        property_id: property.id,
        score,
        category,
        components,
        location: location_detail,
    }
}

fn component(component: MatchComponent, score: f64, detail: String) -> ComponentScore {
    let weight = component.weight();
    let contribution = score * weight;
    ComponentScore {
        component,
        score,
        weight,
        contribution,
        explanation: format!(
            "{} match: {:.1}% (weighted: +{:.1}%) → {}",
            component.label(),
            score * 100.0,
            contribution,
            detail
        ),
    }
}

fn describe_value(value: Option<&str>, score: f64) -> String {
    match value {
        None => "not provided".to_string(),
        Some(v) if score > 0.0 => format!("{} fits buy box", v),
        Some(v) => format!("{} outside buy box", v),
    }
}
