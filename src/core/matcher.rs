use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::core::{filters::is_eligible, scoring::reportable_match};
use crate::models::{BuyerCriteria, FitCategory, MatchEvaluation, PropertyListing};

/// Pools at least this large are scanned on the rayon thread pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Counts describing one pool scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total_considered: usize,
    pub total_evaluated: usize,
    pub total_matched: usize,
    pub good_fit: usize,
    pub marginal_fit: usize,
    pub poor_fit: usize,
}

/// Result of the matching process, bucketed by fit category.
/// Each bucket is ranked by descending score.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub good_fit: Vec<MatchEvaluation>,
    pub marginal_fit: Vec<MatchEvaluation>,
    pub poor_fit: Vec<MatchEvaluation>,
    pub summary: MatchSummary,
}

impl MatchResult {
    /// All matches in rank order
    pub fn ranked(&self) -> impl Iterator<Item = &MatchEvaluation> {
        self.good_fit
            .iter()
            .chain(self.marginal_fit.iter())
            .chain(self.poor_fit.iter())
    }

    pub fn into_ranked(self) -> Vec<MatchEvaluation> {
        let mut ranked = self.good_fit;
        ranked.extend(self.marginal_fit);
        ranked.extend(self.poor_fit);
        ranked
    }
}

/// Pool matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility gate (active, not blacklisted, asset type)
/// 2. Per-pair weighted scoring, reporting floor
/// 3. Stable descending sort
/// 4. Fit category bucketing
///
/// Evaluations are independent, so large pools fan out across threads.
/// Results are collected in input order before sorting, which keeps ties
/// in collection order regardless of scheduling.
#[derive(Debug, Clone)]
pub struct Matcher {
    parallel_threshold: usize,
}

impl Matcher {
    pub fn new(parallel_threshold: usize) -> Self {
        Self {
            parallel_threshold: parallel_threshold.max(1),
        }
    }

    /// Rank every eligible buyer against one property
    ///
    /// # Arguments
    /// * `property` - The property being offered
    /// * `buyers` - The buyer pool, possibly prefiltered by the store
    pub fn match_property_to_buyers(
        &self,
        property: &PropertyListing,
        buyers: &[BuyerCriteria],
    ) -> MatchResult {
        let eligible: Vec<&BuyerCriteria> = buyers
            .iter()
            .filter(|buyer| is_eligible(buyer, property.kind))
            .collect();

        let matches = self.collect_matches(&eligible, |buyer| reportable_match(property, buyer));
        let result = rank(buyers.len(), eligible.len(), matches);

        tracing::info!(
            "Property {} matched {} of {} buyers ({} good, {} marginal, {} poor)",
            property.id,
            result.summary.total_matched,
            result.summary.total_considered,
            result.summary.good_fit,
            result.summary.marginal_fit,
            result.summary.poor_fit
        );

        result
    }

    /// Rank every property against one buyer's buy box
    ///
    /// The same evaluator is reused with the buyer side fixed.
    pub fn match_buyer_to_properties(
        &self,
        buyer: &BuyerCriteria,
        properties: &[PropertyListing],
    ) -> MatchResult {
        let eligible: Vec<&PropertyListing> = properties
            .iter()
            .filter(|property| is_eligible(buyer, property.kind))
            .collect();

        let matches = self.collect_matches(&eligible, |property| reportable_match(property, buyer));
        let result = rank(properties.len(), eligible.len(), matches);

        tracing::info!(
            "Buyer {} matched {} of {} properties ({} good, {} marginal, {} poor)",
            buyer.buyer_id,
            result.summary.total_matched,
            result.summary.total_considered,
            result.summary.good_fit,
            result.summary.marginal_fit,
            result.summary.poor_fit
        );

        result
    }

    fn collect_matches<T, F>(&self, items: &[&T], evaluate: F) -> Vec<MatchEvaluation>
    where
        T: Sync,
        F: Fn(&T) -> Option<MatchEvaluation> + Sync + Send,
    {
        if items.len() >= self.parallel_threshold {
            tracing::debug!("Scanning {} candidates in parallel", items.len());
            items.par_iter().filter_map(|&item| evaluate(item)).collect()
        } else {
            items.iter().filter_map(|&item| evaluate(item)).collect()
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLEL_THRESHOLD)
    }
}

fn rank(total_considered: usize, total_evaluated: usize, mut matches: Vec<MatchEvaluation>) -> MatchResult {
    // sort_by is stable: equal scores keep collection order
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_matched = matches.len();
    let mut result = MatchResult::default();

    for evaluation in matches {
        match evaluation.category {
            FitCategory::GoodFit => result.good_fit.push(evaluation),
            FitCategory::MarginalFit => result.marginal_fit.push(evaluation),
            FitCategory::PoorFit => result.poor_fit.push(evaluation),
        }
    }

    result.summary = MatchSummary {
        total_considered,
        total_evaluated,
        total_matched,
        good_fit: result.good_fit.len(),
        marginal_fit: result.marginal_fit.len(),
        poor_fit: result.poor_fit.len(),
    };

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetType, ExitStrategy, LandType, LotSizeUnit, NumericRange, PropertyKind, PropertyStatus};
    use std::collections::BTreeSet;

    fn create_property(id: i64, address: &str) -> PropertyListing {
        PropertyListing {
            id,
            address: address.to_string(),
            land_type: Some(LandType::new("residential_vacant")),
            lot_size: Some(2.0),
            lot_size_unit: LotSizeUnit::Acres,
            agreed_price: Some(40_000.0),
            exit_strategy: Some(ExitStrategy::Flip),
            zoning: None,
            property_characteristics: BTreeSet::new(),
            location_characteristics: BTreeSet::new(),
            status: PropertyStatus::Submitted,
            kind: PropertyKind::Land,
        }
    }

    fn create_buyer(id: i64, location: &str) -> BuyerCriteria {
        BuyerCriteria {
            buyer_id: id,
            buyer_name: Some(format!("Buyer {}", id)),
            crm_contact_id: None,
            asset_type: AssetType::Both,
            is_active_buyer: true,
            is_blacklisted: false,
            preferred_location: Some(location.to_string()),
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
    fn test_find_matches_basic() {
        let matcher = Matcher::default();
        let property = create_property(1, "123 Main St, Tampa, FL 33602");

        let mut blacklisted = create_buyer(3, "Tampa, FL");
        blacklisted.is_blacklisted = true;
        let mut houses_only = create_buyer(4, "Tampa, FL");
        houses_only.asset_type = AssetType::Houses;

        let buyers = vec![
            create_buyer(1, "Tampa, FL"),
            create_buyer(2, "Miami, FL"),
            blacklisted,
            houses_only,
        ];

        let result = matcher.match_property_to_buyers(&property, &buyers);

        assert_eq!(result.summary.total_considered, 4);
        assert_eq!(result.summary.total_evaluated, 2);
        assert_eq!(result.summary.total_matched, 2);
        let ids: Vec<i64> = result.ranked().map(|m| m.buyer_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let matcher = Matcher::default();
        let property = create_property(1, "123 Main St, Tampa, FL 33602");
        let buyers: Vec<BuyerCriteria> = (1..=5).map(|i| create_buyer(i, "Tampa, FL")).collect();

        let result = matcher.match_property_to_buyers(&property, &buyers);
        let ids: Vec<i64> = result.ranked().map(|m| m.buyer_id).collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let property = create_property(1, "123 Main St, Tampa, FL 33602");
        let locations = ["Tampa, FL", "Miami, FL", "Austin, TX", "Tampa Bay"];
        let buyers: Vec<BuyerCriteria> = (0..200)
            .map(|i| create_buyer(i, locations[i as usize % locations.len()]))
            .collect();

        let sequential = Matcher::new(usize::MAX).match_property_to_buyers(&property, &buyers);
        let parallel = Matcher::new(1).match_property_to_buyers(&property, &buyers);

        assert_eq!(sequential.summary, parallel.summary);
        assert_eq!(sequential.into_ranked(), parallel.into_ranked());
    }

    #[test]
    fn test_buckets_follow_thresholds() {
        let matcher = Matcher::default();
        let property = create_property(1, "123 Main St, Tampa, FL 33602");

        let mut marginal = create_buyer(2, "Tampa, FL");
        // 40 (location) + 0 + 0 + 5 + 0 = 45
        marginal.land_property_types.clear();
        marginal.land_strategies.clear();
        marginal.price = NumericRange::between(0.0, 1.0);

        let mut poor = create_buyer(3, "Austin, TX");
        // 0 + 30 + 0 + 0 + 5 = 35
        poor.land_strategies.clear();
        poor.lot_size = NumericRange::between(10.0, 20.0);

        let buyers = vec![create_buyer(1, "Tampa, FL"), marginal, poor];
        let result = matcher.match_property_to_buyers(&property, &buyers);

        assert_eq!(result.good_fit.len(), 1);
        assert_eq!(result.marginal_fit.len(), 1);
        assert_eq!(result.marginal_fit[0].score, 45.0);
        assert_eq!(result.poor_fit.len(), 1);
        assert_eq!(result.poor_fit[0].score, 35.0);
    }

    #[test]
    fn test_buyer_to_properties() {
        let matcher = Matcher::default();
        let buyer = create_buyer(1, "Tampa, FL");

        let mut house = create_property(3, "1 Palm Ave, Tampa, FL");
        house.kind = PropertyKind::House;

        let properties = vec![
            create_property(1, "9 Oak Rd, Orlando, FL 32801"),
            create_property(2, "123 Main St, Tampa, FL 33602"),
            house,
        ];

        let result = matcher.match_buyer_to_properties(&buyer, &properties);
        let ids: Vec<i64> = result.ranked().map(|m| m.property_id).collect();

        // "both" accepts houses, so all three are evaluated
        assert_eq!(result.summary.total_evaluated, 3);
        assert_eq!(ids[0], 2);
    }

    #[test]
    fn test_inactive_buyer_matches_nothing() {
        let matcher = Matcher::default();
        let mut buyer = create_buyer(1, "Tampa, FL");
        buyer.is_active_buyer = false;

        let result = matcher.match_buyer_to_properties(&buyer, &[create_property(1, "Tampa, FL")]);
        assert_eq!(result.summary.total_evaluated, 0);
        assert_eq!(result.ranked().count(), 0);
    }
}
