use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Square feet in one acre
pub const SQFT_PER_ACRE: f64 = 43_560.0;

/// Kind of asset a buyer is willing to acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Land,
    Houses,
    #[default]
    Both,
}

impl AssetType {
    pub const ALL: [AssetType; 3] = [AssetType::Land, AssetType::Houses, AssetType::Both];

    /// Whether a buyer with this asset type considers properties of `kind`
    pub fn accepts(self, kind: PropertyKind) -> bool {
        matches!(
            (self, kind),
            (AssetType::Both, _)
                | (AssetType::Land, PropertyKind::Land)
                | (AssetType::Houses, PropertyKind::House)
        )
    }

    /// All asset types that accept a property of `kind`
    pub fn accepting(kind: PropertyKind) -> Vec<AssetType> {
        Self::ALL.into_iter().filter(|a| a.accepts(kind)).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Land => "land",
            AssetType::Houses => "houses",
            AssetType::Both => "both",
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "land" => Ok(AssetType::Land),
            "houses" | "house" => Ok(AssetType::Houses),
            "both" => Ok(AssetType::Both),
            other => Err(format!("unknown asset type: {}", other)),
        }
    }
}

/// Kind of property being evaluated. Seller submissions on the platform are land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Land,
    House,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Land => "land",
            PropertyKind::House => "house",
        }
    }
}

impl FromStr for PropertyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "land" => Ok(PropertyKind::Land),
            "house" | "houses" => Ok(PropertyKind::House),
            other => Err(format!("unknown property kind: {}", other)),
        }
    }
}

/// Unit a lot size was submitted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LotSizeUnit {
    #[default]
    #[serde(rename = "acres", alias = "acre")]
    Acres,
    #[serde(rename = "sqft", alias = "square_feet", alias = "sq_ft")]
    Sqft,
}

impl LotSizeUnit {
    /// Convert a lot size in this unit to acres
    #[inline]
    pub fn to_acres(self, value: f64) -> f64 {
        match self {
            LotSizeUnit::Acres => value,
            LotSizeUnit::Sqft => value / SQFT_PER_ACRE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LotSizeUnit::Acres => "acres",
            LotSizeUnit::Sqft => "sqft",
        }
    }
}

impl FromStr for LotSizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acres" | "acre" => Ok(LotSizeUnit::Acres),
            "sqft" | "square_feet" | "sq_ft" => Ok(LotSizeUnit::Sqft),
            other => Err(format!("unknown lot size unit: {}", other)),
        }
    }
}

/// Deal pipeline status of a property submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Submitted,
    UnderReviewWithBuyer,
    BuyerApproved,
    BuyerRejected,
    MlsPending,
    MlsActive,
    Sold,
    Canceled,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Submitted => "submitted",
            PropertyStatus::UnderReviewWithBuyer => "under_review_with_buyer",
            PropertyStatus::BuyerApproved => "buyer_approved",
            PropertyStatus::BuyerRejected => "buyer_rejected",
            PropertyStatus::MlsPending => "mls_pending",
            PropertyStatus::MlsActive => "mls_active",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Canceled => "canceled",
        }
    }

    /// Closed deals are no longer offered to buyers
    pub fn is_closed(self) -> bool {
        matches!(self, PropertyStatus::Sold | PropertyStatus::Canceled)
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(PropertyStatus::Submitted),
            "under_review_with_buyer" => Ok(PropertyStatus::UnderReviewWithBuyer),
            "buyer_approved" => Ok(PropertyStatus::BuyerApproved),
            "buyer_rejected" => Ok(PropertyStatus::BuyerRejected),
            "mls_pending" => Ok(PropertyStatus::MlsPending),
            "mls_active" => Ok(PropertyStatus::MlsActive),
            "sold" => Ok(PropertyStatus::Sold),
            "canceled" | "cancelled" => Ok(PropertyStatus::Canceled),
            other => Err(format!("unknown property status: {}", other)),
        }
    }
}

/// Intended disposition plan for a property
///
/// Known strategies are parsed from either their stored value (`"flip"`) or
/// their display label (`"Buy & Flip"`). Anything else is kept, normalized,
/// as `Other` so substring matching still works on free-form buyer input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExitStrategy {
    Infill,
    Flip,
    Subdivide,
    SellerFinancing,
    Rezoning,
    MobileHome,
    Other(String),
}

impl ExitStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            ExitStrategy::Infill => "infill",
            ExitStrategy::Flip => "flip",
            ExitStrategy::Subdivide => "subdivide",
            ExitStrategy::SellerFinancing => "seller_financing",
            ExitStrategy::Rezoning => "rezoning",
            ExitStrategy::MobileHome => "mobile_home",
            ExitStrategy::Other(value) => value,
        }
    }
}

impl From<&str> for ExitStrategy {
    fn from(raw: &str) -> Self {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "infill" | "infill lot development" => ExitStrategy::Infill,
            "flip" | "buy & flip" | "buy and flip" => ExitStrategy::Flip,
            "subdivide" | "subdivide & sell" | "subdivide and sell" => ExitStrategy::Subdivide,
            "seller_financing" | "seller financing" => ExitStrategy::SellerFinancing,
            "rezoning" | "entitlement/rezoning" | "entitlement" => ExitStrategy::Rezoning,
            "mobile_home" | "mobile home lot" | "mobile home" => ExitStrategy::MobileHome,
            _ => ExitStrategy::Other(normalized),
        }
    }
}

impl From<String> for ExitStrategy {
    fn from(raw: String) -> Self {
        ExitStrategy::from(raw.as_str())
    }
}

impl From<ExitStrategy> for String {
    fn from(value: ExitStrategy) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ExitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Land type value, normalized for comparison (trimmed, lowercased, single spaces)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LandType(String);

impl LandType {
    pub fn new(raw: &str) -> Self {
        Self(raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for LandType {
    fn from(raw: String) -> Self {
        LandType::new(&raw)
    }
}

impl From<&str> for LandType {
    fn from(raw: &str) -> Self {
        LandType::new(raw)
    }
}

impl From<LandType> for String {
    fn from(value: LandType) -> Self {
        value.0
    }
}

impl fmt::Display for LandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive numeric range where either bound may be open
///
/// An open minimum behaves as 0 and an open maximum as infinity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min.unwrap_or(0.0) && value <= self.max.unwrap_or(f64::INFINITY)
    }
}

/// Parse a decimal from loosely formatted text such as `"$40,000"` or `" 2.5 "`
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts a number, a numeric string, or null. Unparseable values become `None`
/// so the dependent score component fails closed instead of rejecting the record.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        serde_json::Value::String(s) => parse_decimal(&s),
        _ => None,
    }))
}

fn default_true() -> bool { true }

/// Property submission as seen by the matching engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub land_type: Option<LandType>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub lot_size: Option<f64>,
    #[serde(default)]
    pub lot_size_unit: LotSizeUnit,
    #[serde(default, alias = "askingPrice", deserialize_with = "deserialize_lenient_f64")]
    pub agreed_price: Option<f64>,
    #[serde(default)]
    pub exit_strategy: Option<ExitStrategy>,
    #[serde(default)]
    pub zoning: Option<String>,
    #[serde(default)]
    pub property_characteristics: BTreeSet<String>,
    #[serde(default)]
    pub location_characteristics: BTreeSet<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub kind: PropertyKind,
}

impl PropertyListing {
    /// Lot size normalized to acres
    pub fn lot_size_acres(&self) -> Option<f64> {
        self.lot_size.map(|size| self.lot_size_unit.to_acres(size))
    }
}

/// A buyer's acquisition criteria ("buy box")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerCriteria {
    pub buyer_id: i64,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub crm_contact_id: Option<String>,
    #[serde(default)]
    pub asset_type: AssetType,
    #[serde(default = "default_true")]
    pub is_active_buyer: bool,
    #[serde(default)]
    pub is_blacklisted: bool,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub land_property_types: BTreeSet<LandType>,
    #[serde(default)]
    pub land_strategies: BTreeSet<ExitStrategy>,
    /// Acres
    #[serde(default)]
    pub lot_size: NumericRange,
    #[serde(default)]
    pub price: NumericRange,
    #[serde(default)]
    pub zoning: BTreeSet<String>,
    #[serde(default)]
    pub strict_requirements: BTreeSet<String>,
    #[serde(default)]
    pub location_characteristics: BTreeSet<String>,
    #[serde(default)]
    pub property_characteristics: BTreeSet<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Normalized location components extracted from an address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub full_address: Option<String>,
}

impl ParsedAddress {
    pub fn get(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::City => self.city.as_deref(),
            AddressField::State => self.state.as_deref(),
            AddressField::County => self.county.as_deref(),
            AddressField::ZipCode => self.zip_code.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ParsedAddress::default()
    }
}

/// Address components compared by the location scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    City,
    State,
    County,
    ZipCode,
}

impl AddressField {
    pub const COMPARED: [AddressField; 4] = [
        AddressField::City,
        AddressField::State,
        AddressField::County,
        AddressField::ZipCode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::County => "county",
            AddressField::ZipCode => "zip",
        }
    }
}

/// How a location score was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LocationDetail {
    MissingAddress,
    CountryMismatch {
        buyer_country: String,
        property_country: String,
    },
    Components {
        matched: Vec<AddressField>,
        compared: Vec<AddressField>,
    },
    ExactText,
    TokenOverlap { overlap: f64 },
    NoOverlap { overlap: f64 },
}

impl fmt::Display for LocationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationDetail::MissingAddress => f.write_str("missing address"),
            LocationDetail::CountryMismatch { buyer_country, property_country } => {
                write!(f, "country mismatch: {} vs {}", buyer_country, property_country)
            }
            LocationDetail::Components { matched, compared } => {
                let parts: Vec<String> = compared
                    .iter()
                    .map(|field| {
                        let outcome = if matched.contains(field) { "match" } else { "mismatch" };
                        format!("{} {}", field.as_str(), outcome)
                    })
                    .collect();
                f.write_str(&parts.join(", "))
            }
            LocationDetail::ExactText => f.write_str("exact address text match"),
            LocationDetail::TokenOverlap { overlap } => {
                write!(f, "partial text overlap {:.0}%", overlap * 100.0)
            }
            LocationDetail::NoOverlap { overlap } => {
                write!(f, "no meaningful overlap ({:.0}% of tokens shared)", overlap * 100.0)
            }
        }
    }
}

/// Fixed scoring weights in percentage points
///
/// These encode the business policy that location and land type dominate
/// buyer interest. They are constants, not tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub location: f64,
    pub land_type: f64,
    pub exit_strategy: f64,
    pub lot_size: f64,
    pub price: f64,
}

impl ScoringWeights {
    pub const POLICY: ScoringWeights = ScoringWeights {
        location: 40.0,
        land_type: 30.0,
        exit_strategy: 20.0,
        lot_size: 5.0,
        price: 5.0,
    };

    pub fn total(&self) -> f64 {
        self.location + self.land_type + self.exit_strategy + self.lot_size + self.price
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::POLICY
    }
}

/// A single scored factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchComponent {
    Location,
    LandType,
    ExitStrategy,
    LotSize,
    Price,
}

impl MatchComponent {
    pub const ALL: [MatchComponent; 5] = [
        MatchComponent::Location,
        MatchComponent::LandType,
        MatchComponent::ExitStrategy,
        MatchComponent::LotSize,
        MatchComponent::Price,
    ];

    pub fn weight(self) -> f64 {
        let weights = ScoringWeights::POLICY;
        match self {
            MatchComponent::Location => weights.location,
            MatchComponent::LandType => weights.land_type,
            MatchComponent::ExitStrategy => weights.exit_strategy,
            MatchComponent::LotSize => weights.lot_size,
            MatchComponent::Price => weights.price,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchComponent::Location => "Location",
            MatchComponent::LandType => "Land type",
            MatchComponent::ExitStrategy => "Exit strategy",
            MatchComponent::LotSize => "Lot size",
            MatchComponent::Price => "Price",
        }
    }
}

/// Normalized score and weighted contribution of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
    pub component: MatchComponent,
    /// 0.0 - 1.0
    pub score: f64,
    /// Percentage points
    pub weight: f64,
    pub contribution: f64,
    pub explanation: String,
}

/// Fit category derived from the aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitCategory {
    GoodFit,
    MarginalFit,
    PoorFit,
}

impl FitCategory {
    pub const GOOD_FIT_ABOVE: f64 = 45.0;
    pub const MARGINAL_FIT_FROM: f64 = 40.0;

    /// `> 45` is a good fit, `40..=45` marginal, anything lower poor
    pub fn from_score(score: f64) -> Self {
        if score > Self::GOOD_FIT_ABOVE {
            FitCategory::GoodFit
        } else if score >= Self::MARGINAL_FIT_FROM {
            FitCategory::MarginalFit
        } else {
            FitCategory::PoorFit
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitCategory::GoodFit => "Good Fit",
            FitCategory::MarginalFit => "Marginal Fit",
            FitCategory::PoorFit => "Poor Fit",
        }
    }
}

impl fmt::Display for FitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored (property, buyer) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvaluation {
    pub buyer_id: i64,
    pub property_id: i64,
    /// 0 - 100
    pub score: f64,
    pub category: FitCategory,
    pub components: Vec<ComponentScore>,
    pub location: LocationDetail,
}

impl MatchEvaluation {
    pub fn component(&self, component: MatchComponent) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.component == component)
    }

    pub fn explanations(&self) -> Vec<String> {
        self.components.iter().map(|c| c.explanation.clone()).collect()
    }
}

/// Record that a property was sent to a buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealLogEntry {
    pub id: uuid::Uuid,
    pub property_id: i64,
    pub buyer_id: i64,
    pub match_score: Option<f64>,
    pub status: PropertyStatus,
    pub notes: Option<String>,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_weights_sum_to_100() {
        assert_eq!(ScoringWeights::POLICY.total(), 100.0);
        let sum: f64 = MatchComponent::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(sum, 100.0);
    }

    #[test]
    fn test_fit_category_boundaries() {
        assert_eq!(FitCategory::from_score(45.0), FitCategory::MarginalFit);
        assert_eq!(FitCategory::from_score(45.01), FitCategory::GoodFit);
        assert_eq!(FitCategory::from_score(40.0), FitCategory::MarginalFit);
        assert_eq!(FitCategory::from_score(39.99), FitCategory::PoorFit);
    }

    #[test]
    fn test_exit_strategy_parses_values_and_labels() {
        assert_eq!(ExitStrategy::from("flip"), ExitStrategy::Flip);
        assert_eq!(ExitStrategy::from("Buy & Flip"), ExitStrategy::Flip);
        assert_eq!(ExitStrategy::from(" Seller  Financing "), ExitStrategy::SellerFinancing);
        assert_eq!(
            ExitStrategy::from("Wholesale Assignment"),
            ExitStrategy::Other("wholesale assignment".to_string())
        );
    }

    #[test]
    fn test_land_type_normalization() {
        assert_eq!(LandType::new("  Residential_Vacant "), LandType::new("residential_vacant"));
        assert_eq!(LandType::new("Raw   Land").as_str(), "raw land");
    }

    #[test]
    fn test_asset_type_acceptance() {
        assert!(AssetType::Land.accepts(PropertyKind::Land));
        assert!(AssetType::Both.accepts(PropertyKind::Land));
        assert!(!AssetType::Houses.accepts(PropertyKind::Land));
        assert_eq!(
            AssetType::accepting(PropertyKind::Land),
            vec![AssetType::Land, AssetType::Both]
        );
    }

    #[test]
    fn test_open_range_bounds() {
        let open = NumericRange::default();
        assert!(open.contains(0.0));
        assert!(open.contains(1_000_000_000.0));

        let min_only = NumericRange::new(Some(10.0), None);
        assert!(!min_only.contains(9.99));
        assert!(min_only.contains(1e12));

        let bounded = NumericRange::between(2.0, 3.0);
        assert!(bounded.contains(2.0));
        assert!(bounded.contains(3.0));
        assert!(!bounded.contains(3.01));
        assert!(!bounded.contains(f64::NAN));
    }

    #[test]
    fn test_sqft_to_acres() {
        assert!((LotSizeUnit::Sqft.to_acres(108_900.0) - 2.5).abs() < 1e-9);
        assert_eq!(LotSizeUnit::Acres.to_acres(2.5), 2.5);
    }

    #[test]
    fn test_lenient_price_deserialization() {
        let listing: PropertyListing = serde_json::from_value(serde_json::json!({
            "id": 7,
            "address": "1 Oak Rd, Ocala, FL",
            "agreedPrice": "$40,000",
            "lotSize": "not a number",
            "lotSizeUnit": "sqft"
        }))
        .unwrap();

        assert_eq!(listing.agreed_price, Some(40_000.0));
        assert_eq!(listing.lot_size, None);
        assert_eq!(listing.lot_size_unit, LotSizeUnit::Sqft);
    }

    #[test]
    fn test_buyer_criteria_defaults() {
        let buyer: BuyerCriteria = serde_json::from_value(serde_json::json!({
            "buyerId": 3,
            "landStrategies": ["Buy & Flip", "subdivide"],
            "price": { "min": 30000, "max": null }
        }))
        .unwrap();

        assert!(buyer.is_active_buyer);
        assert!(!buyer.is_blacklisted);
        assert_eq!(buyer.asset_type, AssetType::Both);
        assert!(buyer.land_strategies.contains(&ExitStrategy::Flip));
        assert_eq!(buyer.price, NumericRange::new(Some(30000.0), None));
    }

    #[test]
    fn test_location_detail_display() {
        let detail = LocationDetail::Components {
            matched: vec![AddressField::State],
            compared: vec![AddressField::City, AddressField::State],
        };
        assert_eq!(detail.to_string(), "city mismatch, state match");
    }
}
