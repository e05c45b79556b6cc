use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::models::{AssetType, BuyerCriteria, ExitStrategy, LandType, NumericRange, PropertyKind};

/// Why a buyer was not evaluated at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    Inactive,
    Blacklisted,
    AssetTypeMismatch,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Inactive => f.write_str("buyer is not active"),
            Ineligibility::Blacklisted => f.write_str("buyer is blacklisted"),
            Ineligibility::AssetTypeMismatch => f.write_str("buyer does not acquire this asset type"),
        }
    }
}

/// Eligibility gate applied before any scoring work
///
/// This is the only place the gate is defined; the store query built by
/// `BuyerPoolQuery` and the pool matcher both derive from it.
#[inline]
pub fn check_eligibility(buyer: &BuyerCriteria, kind: PropertyKind) -> Result<(), Ineligibility> {
    if !buyer.is_active_buyer {
        return Err(Ineligibility::Inactive);
    }
    if buyer.is_blacklisted {
        return Err(Ineligibility::Blacklisted);
    }
    if !buyer.asset_type.accepts(kind) {
        return Err(Ineligibility::AssetTypeMismatch);
    }
    Ok(())
}

#[inline]
pub fn is_eligible(buyer: &BuyerCriteria, kind: PropertyKind) -> bool {
    check_eligibility(buyer, kind).is_ok()
}

/// Store-side prefilter for the buyer pool of one property kind
#[derive(Debug, Clone)]
pub struct BuyerPoolQuery {
    pub accepted_asset_types: Vec<AssetType>,
}

impl BuyerPoolQuery {
    pub fn for_kind(kind: PropertyKind) -> Self {
        Self {
            accepted_asset_types: AssetType::accepting(kind),
        }
    }

    pub fn asset_type_values(&self) -> Vec<String> {
        self.accepted_asset_types
            .iter()
            .map(|a| a.as_str().to_string())
            .collect()
    }
}

/// 1.0 when the property's land type is one the buyer wants
#[inline]
pub fn land_type_score(land_type: Option<&LandType>, desired: &BTreeSet<LandType>) -> f64 {
    match land_type {
        Some(lt) if !lt.is_empty() && desired.contains(lt) => 1.0,
        _ => 0.0,
    }
}

/// 1.0 when the property's exit strategy and any desired strategy contain
/// one another (case-insensitive, `_` and whitespace treated alike)
#[inline]
pub fn exit_strategy_score(strategy: Option<&ExitStrategy>, desired: &BTreeSet<ExitStrategy>) -> f64 {
    let Some(strategy) = strategy else {
        return 0.0;
    };
    let property = normalize_strategy(strategy);
    if property.is_empty() {
        return 0.0;
    }

    let hit = desired.iter().any(|wanted| {
        let wanted = normalize_strategy(wanted);
        !wanted.is_empty() && (property.contains(&wanted) || wanted.contains(&property))
    });

    if hit { 1.0 } else { 0.0 }
}

/// "seller_financing" and "Seller  Financing" both become "seller financing"
fn normalize_strategy(strategy: &ExitStrategy) -> String {
    strategy
        .as_str()
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 1.0 when the lot size (already in acres) falls inside the buyer's range
#[inline]
pub fn lot_size_score(lot_size_acres: Option<f64>, range: &NumericRange) -> f64 {
    range_score(lot_size_acres, range)
}

/// 1.0 when the agreed price falls inside the buyer's range
#[inline]
pub fn price_score(price: Option<f64>, range: &NumericRange) -> f64 {
    range_score(price, range)
}

#[inline]
fn range_score(value: Option<f64>, range: &NumericRange) -> f64 {
    match value {
        Some(v) if range.contains(v) => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_buyer() -> BuyerCriteria {
        BuyerCriteria {
            buyer_id: 1,
            buyer_name: Some("Test Buyer".to_string()),
            crm_contact_id: None,
            asset_type: AssetType::Land,
            is_active_buyer: true,
            is_blacklisted: false,
            preferred_location: Some("Tampa, FL".to_string()),
            land_property_types: BTreeSet::from([LandType::new("residential_vacant")]),
            land_strategies: BTreeSet::from([ExitStrategy::Flip]),
            lot_size: NumericRange::between(1.0, 5.0),
            price: NumericRange::between(30_000.0, 50_000.0),
            zoning: BTreeSet::new(),
            strict_requirements: BTreeSet::new(),
            location_characteristics: BTreeSet::new(),
            property_characteristics: BTreeSet::new(),
            notes: None,
        }
    }

    #[test]
    fn test_eligible_buyer() {
        let buyer = create_test_buyer();
        assert!(is_eligible(&buyer, PropertyKind::Land));
    }

    #[test]
    fn test_inactive_buyer_filtered() {
        let mut buyer = create_test_buyer();
        buyer.is_active_buyer = false;
        assert_eq!(check_eligibility(&buyer, PropertyKind::Land), Err(Ineligibility::Inactive));
    }

    #[test]
    fn test_blacklisted_buyer_filtered() {
        let mut buyer = create_test_buyer();
        buyer.is_blacklisted = true;
        assert_eq!(check_eligibility(&buyer, PropertyKind::Land), Err(Ineligibility::Blacklisted));
    }

    #[test]
    fn test_houses_buyer_filtered_for_land() {
        let mut buyer = create_test_buyer();
        buyer.asset_type = AssetType::Houses;
        assert_eq!(
            check_eligibility(&buyer, PropertyKind::Land),
            Err(Ineligibility::AssetTypeMismatch)
        );
        buyer.asset_type = AssetType::Both;
        assert!(is_eligible(&buyer, PropertyKind::Land));
    }

    #[test]
    fn test_pool_query_matches_gate() {
        let query = BuyerPoolQuery::for_kind(PropertyKind::Land);
        assert_eq!(query.asset_type_values(), vec!["land", "both"]);
    }

    #[test]
    fn test_land_type_membership() {
        let desired = BTreeSet::from([LandType::new("residential_vacant"), LandType::new("farm")]);
        assert_eq!(land_type_score(Some(&LandType::new(" Residential_Vacant")), &desired), 1.0);
        assert_eq!(land_type_score(Some(&LandType::new("commercial")), &desired), 0.0);
        assert_eq!(land_type_score(None, &desired), 0.0);
        assert_eq!(land_type_score(Some(&LandType::new("farm")), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_exit_strategy_containment_either_direction() {
        let desired = BTreeSet::from([ExitStrategy::from("seller financing deals")]);
        assert_eq!(exit_strategy_score(Some(&ExitStrategy::from("financing")), &desired), 1.0);

        let desired = BTreeSet::from([ExitStrategy::Flip]);
        assert_eq!(exit_strategy_score(Some(&ExitStrategy::from("quick flip")), &desired), 1.0);
        assert_eq!(exit_strategy_score(Some(&ExitStrategy::Subdivide), &desired), 0.0);
        assert_eq!(exit_strategy_score(None, &desired), 0.0);
    }

    #[test]
    fn test_exit_strategy_known_value_inside_free_text() {
        let property = ExitStrategy::from("Seller Financing");
        assert_eq!(property, ExitStrategy::SellerFinancing);

        let desired = BTreeSet::from([ExitStrategy::from("Seller Financing deals")]);
        assert_eq!(exit_strategy_score(Some(&property), &desired), 1.0);

        let desired = BTreeSet::from([ExitStrategy::from("mobile home park")]);
        assert_eq!(exit_strategy_score(Some(&ExitStrategy::MobileHome), &desired), 1.0);
    }

    #[test]
    fn test_exit_strategy_ignores_empty_values() {
        let desired = BTreeSet::from([ExitStrategy::from("")]);
        assert_eq!(exit_strategy_score(Some(&ExitStrategy::Flip), &desired), 0.0);
        let desired = BTreeSet::from([ExitStrategy::Flip]);
        assert_eq!(exit_strategy_score(Some(&ExitStrategy::from("  ")), &desired), 0.0);
    }

    #[test]
    fn test_range_scores() {
        let lot = NumericRange::between(2.0, 3.0);
        assert_eq!(lot_size_score(Some(2.5), &lot), 1.0);
        assert_eq!(lot_size_score(Some(3.5), &lot), 0.0);
        assert_eq!(lot_size_score(None, &lot), 0.0);

        let open_price = NumericRange::default();
        assert_eq!(price_score(Some(1_000_000.0), &open_price), 1.0);
        assert_eq!(price_score(None, &open_price), 0.0);
    }
}
