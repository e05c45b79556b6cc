// Integration tests for landmatch pool matching

use landmatch::core::{BuyerPoolQuery, Matcher};
use landmatch::models::{
    AssetType, BuyerCriteria, ExitStrategy, FitCategory, LandType, LotSizeUnit, MatchComponent, NumericRange,
    PropertyKind, PropertyListing, PropertyStatus,
};
use landmatch::presenter::MatchPresenter;
use std::collections::BTreeSet;

fn create_test_property(id: i64) -> PropertyListing {
    PropertyListing {
        id,
        address: "123 Main St, Tampa, FL 33602".to_string(),
        land_type: Some(LandType::new("residential_vacant")),
        lot_size: Some(2.5),
        lot_size_unit: LotSizeUnit::Acres,
        agreed_price: Some(40_000.0),
        exit_strategy: Some(ExitStrategy::Flip),
        zoning: Some("R-1".to_string()),
        property_characteristics: BTreeSet::new(),
        location_characteristics: BTreeSet::new(),
        status: PropertyStatus::Submitted,
        kind: PropertyKind::Land,
    }
}

fn create_test_buyer(id: i64, location: &str) -> BuyerCriteria {
    BuyerCriteria {
        buyer_id: id,
        buyer_name: Some(format!("Buyer {}", id)),
        crm_contact_id: Some(format!("contact-{}", id)),
        asset_type: AssetType::Land,
        is_active_buyer: true,
        is_blacklisted: false,
        preferred_location: Some(location.to_string()),
        land_property_types: BTreeSet::from([LandType::new("residential_vacant")]),
        land_strategies: BTreeSet::from([ExitStrategy::Flip]),
        lot_size: NumericRange::between(2.0, 3.0),
        price: NumericRange::between(30_000.0, 50_000.0),
        zoning: BTreeSet::new(),
        strict_requirements: BTreeSet::new(),
        location_characteristics: BTreeSet::new(),
        property_characteristics: BTreeSet::new(),
        notes: None,
    }
}

#[test]
fn test_full_match_scores_100() {
    let matcher = Matcher::default();
    let property = create_test_property(1);
    let buyers = vec![create_test_buyer(1, "Tampa, FL")];

    let result = matcher.match_property_to_buyers(&property, &buyers);

    assert_eq!(result.good_fit.len(), 1);
    let evaluation = &result.good_fit[0];
    assert_eq!(evaluation.score, 100.0);
    assert_eq!(evaluation.category, FitCategory::GoodFit);
    assert_eq!(evaluation.explanations().len(), 5);
}

#[test]
fn test_partial_location_match() {
    let matcher = Matcher::default();
    let property = create_test_property(1);
    let buyers = vec![create_test_buyer(1, "Miami, FL")];

    let result = matcher.match_property_to_buyers(&property, &buyers);
    let evaluation = &result.good_fit[0];

    let location = evaluation.component(MatchComponent::Location).unwrap();
    assert_eq!(location.score, 0.5);
    assert_eq!(location.contribution, 20.0);
    assert_eq!(evaluation.score, 80.0);
    assert!(location.explanation.contains("city mismatch, state match"));
}

#[test]
fn test_blacklisted_buyer_excluded_from_pool() {
    let matcher = Matcher::default();
    let property = create_test_property(1);

    let mut blacklisted = create_test_buyer(2, "Tampa, FL");
    blacklisted.is_blacklisted = true;
    let buyers = vec![create_test_buyer(1, "Tampa, FL"), blacklisted];

    let result = matcher.match_property_to_buyers(&property, &buyers);

    assert_eq!(result.summary.total_considered, 2);
    assert_eq!(result.summary.total_evaluated, 1);
    assert!(result.ranked().all(|m| m.buyer_id != 2));
}

#[test]
fn test_price_outside_range() {
    let matcher = Matcher::default();
    let mut property = create_test_property(1);
    property.agreed_price = Some(60_000.0);
    let buyers = vec![create_test_buyer(1, "Tampa, FL")];

    let result = matcher.match_property_to_buyers(&property, &buyers);
    let evaluation = &result.good_fit[0];

    assert_eq!(evaluation.component(MatchComponent::Price).unwrap().score, 0.0);
    assert_eq!(evaluation.score, 95.0);
    assert_eq!(evaluation.category, FitCategory::GoodFit);
}

#[test]
fn test_pool_ranking_and_buckets() {
    let matcher = Matcher::default();
    let property = create_test_property(1);

    // 0 location + 30 + 20 + 5 + 5 = 60
    let elsewhere = create_test_buyer(2, "Austin, TX");
    // 40 + 0 + 0 + 5 + 0 = 45
    let marginal = BuyerCriteria {
        land_property_types: BTreeSet::new(),
        land_strategies: BTreeSet::new(),
        price: NumericRange::between(1.0, 2.0),
        ..create_test_buyer(3, "Tampa, FL")
    };
    // 0 + 30 + 0 + 0 + 5 = 35
    let poor = BuyerCriteria {
        land_strategies: BTreeSet::from([ExitStrategy::Subdivide]),
        lot_size: NumericRange::between(10.0, 20.0),
        ..create_test_buyer(4, "Austin, TX")
    };
    let buyers = vec![poor, marginal, elsewhere, create_test_buyer(1, "Tampa, FL")];

    let result = matcher.match_property_to_buyers(&property, &buyers);

    let good: Vec<i64> = result.good_fit.iter().map(|m| m.buyer_id).collect();
    assert_eq!(good, vec![1, 2]);
    assert_eq!(result.marginal_fit.len(), 1);
    assert_eq!(result.marginal_fit[0].buyer_id, 3);
    assert_eq!(result.poor_fit.len(), 1);
    assert_eq!(result.poor_fit[0].score, 35.0);

    let scores: Vec<f64> = result.ranked().map(|m| m.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(result.summary.total_matched, 4);
}

#[test]
fn test_house_property_skips_land_only_buyers() {
    let matcher = Matcher::default();
    let mut property = create_test_property(1);
    property.kind = PropertyKind::House;

    let land_only = create_test_buyer(1, "Tampa, FL");
    let both = BuyerCriteria {
        asset_type: AssetType::Both,
        ..create_test_buyer(2, "Tampa, FL")
    };

    let result = matcher.match_property_to_buyers(&property, &[land_only, both]);
    let ids: Vec<i64> = result.ranked().map(|m| m.buyer_id).collect();
    assert_eq!(ids, vec![2]);

    let pool_query = BuyerPoolQuery::for_kind(PropertyKind::House);
    assert_eq!(pool_query.asset_type_values(), vec!["houses".to_string(), "both".to_string()]);
}

#[test]
fn test_buyer_view_end_to_end() {
    let matcher = Matcher::default();
    let presenter = MatchPresenter::default();
    let buyer = create_test_buyer(1, "Tampa, FL");

    let mut orlando = create_test_property(2);
    orlando.address = "9 Oak Rd, Orlando, FL 32801".to_string();
    let properties = vec![orlando, create_test_property(1)];

    let result = matcher.match_buyer_to_properties(&buyer, &properties);
    let response = presenter.buyer_matches(&buyer, &result, &properties);

    // Orlando: city mismatch, state match, zip not compared -> 20 + 60 = 80
    let ids: Vec<i64> = response.good_fit.iter().map(|p| p.property_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(response.good_fit[1].match_score, 80.0);
    assert_eq!(response.summary.good_fit, 2);
}
