// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AddressField, AssetType, BuyerCriteria, ComponentScore, DealLogEntry, ExitStrategy, FitCategory, LandType,
    LocationDetail, LotSizeUnit, MatchComponent, MatchEvaluation, NumericRange, ParsedAddress, PropertyKind,
    PropertyListing, PropertyStatus, ScoringWeights,
};
pub use requests::{EvaluateMatchRequest, MatchesQuery, RecordSentMatchRequest};
pub use responses::{
    BuyBoxFilterView, BuyerMatchView, BuyerMatchesResponse, DealLogResponse, ErrorResponse, EvaluateMatchResponse,
    HealthResponse, PropertyMatchView, PropertyMatchesResponse, RecordSentMatchResponse,
};
