use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{calculate_match_score, is_eligible, BuyerPoolQuery, Matcher};
use crate::models::{
    DealLogResponse, ErrorResponse, EvaluateMatchRequest, HealthResponse, MatchesQuery, PropertyMatchesResponse,
    BuyerMatchesResponse, PropertyStatus, RecordSentMatchRequest, RecordSentMatchResponse,
};
use crate::presenter::MatchPresenter;
use crate::services::{CacheKey, CacheManager, CrmClient, MatchSyncUpdate, PostgresClient, PostgresError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    /// None when no CRM is configured
    pub crm: Option<Arc<CrmClient>>,
    pub matcher: Matcher,
    pub presenter: MatchPresenter,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/properties/{id}/matches", web::get().to(property_matches))
        .route("/properties/{id}/deal-log", web::get().to(deal_log))
        .route("/buyers/{id}/matches", web::get().to(buyer_matches))
        .route("/matches/evaluate", web::post().to(evaluate_match))
        .route("/matches/sent", web::post().to(record_sent_match));
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

/// Store failures: missing records are 404, everything else 500
fn store_error(context: &str, e: PostgresError) -> HttpResponse {
    match e {
        PostgresError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Not found", e),
        PostgresError::InvalidInput(_) => error_response(StatusCode::BAD_REQUEST, context, e),
        _ => {
            tracing::error!("{}: {}", context, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context, e)
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// All buyers matching one property, categorized by fit
///
/// GET /api/v1/properties/{id}/matches?refresh=false
async fn property_matches(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    let property_id = path.into_inner();
    let cache_key = CacheKey::property_matches(property_id);

    if !query.refresh {
        match state.cache.lookup::<PropertyMatchesResponse>(&cache_key).await {
            Ok(Some(cached)) => return HttpResponse::Ok().json(cached),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
        }
    }

    let property = match state.postgres.get_property(property_id).await {
        Ok(property) => property,
        Err(e) => return store_error("Failed to fetch property", e),
    };

    let pool_query = BuyerPoolQuery::for_kind(property.kind);
    let buyers = match state.postgres.fetch_eligible_buy_boxes(&pool_query).await {
        Ok(buyers) => buyers,
        Err(e) => return store_error("Failed to fetch buy boxes", e),
    };

    tracing::info!("Matching property {} against {} buy boxes", property_id, buyers.len());

    let matcher = state.matcher.clone();
    let scan = web::block(move || {
        let result = matcher.match_property_to_buyers(&property, &buyers);
        (property, buyers, result)
    })
    .await;

    let (property, buyers, result) = match scan {
        Ok(scan) => scan,
        Err(e) => {
            tracing::error!("Match scan for property {} failed: {}", property_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Match scan failed", e);
        }
    };

    let response = state.presenter.property_matches(&property, &result, &buyers);

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache {}: {}", cache_key, e);
    }

    HttpResponse::Ok().json(response)
}

/// All properties matching one buyer's buy box, categorized by fit
///
/// GET /api/v1/buyers/{id}/matches?refresh=false
async fn buyer_matches(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    let buyer_id = path.into_inner();
    let cache_key = CacheKey::buyer_matches(buyer_id);

    if !query.refresh {
        match state.cache.lookup::<BuyerMatchesResponse>(&cache_key).await {
            Ok(Some(cached)) => return HttpResponse::Ok().json(cached),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
        }
    }

    let buyer = match state.postgres.get_buy_box(buyer_id).await {
        Ok(buyer) => buyer,
        Err(e) => return store_error("Failed to fetch buy box", e),
    };

    let properties = match state.postgres.fetch_matchable_properties().await {
        Ok(properties) => properties,
        Err(e) => return store_error("Failed to fetch properties", e),
    };

    let matcher = state.matcher.clone();
    let scan = web::block(move || {
        let result = matcher.match_buyer_to_properties(&buyer, &properties);
        (buyer, properties, result)
    })
    .await;

    let (buyer, properties, result) = match scan {
        Ok(scan) => scan,
        Err(e) => {
            tracing::error!("Match scan for buyer {} failed: {}", buyer_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Match scan failed", e);
        }
    };

    let response = state.presenter.buyer_matches(&buyer, &result, &properties);

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache {}: {}", cache_key, e);
    }

    HttpResponse::Ok().json(response)
}

/// Score an ad-hoc (property, buy box) pair without touching the store
///
/// POST /api/v1/matches/evaluate
///
/// Request body:
/// ```json
/// {
///   "property": { "address": "123 Main St, Tampa, FL 33602", "lotSize": 2.5, ... },
///   "buyer": { "buyerId": 1, "preferredLocation": "Tampa, FL", ... }
/// }
/// ```
async fn evaluate_match(state: web::Data<AppState>, req: web::Json<EvaluateMatchRequest>) -> impl Responder {
    let EvaluateMatchRequest { property, buyer } = req.into_inner();
    HttpResponse::Ok().json(state.presenter.evaluation(&property, &buyer))
}

/// Record that a property was sent to a buyer
///
/// POST /api/v1/matches/sent
///
/// Request body:
/// ```json
/// {
///   "propertyId": 42,
///   "buyerId": 7,
///   "status": "under_review_with_buyer",
///   "notes": "string"
/// }
/// ```
async fn record_sent_match(state: web::Data<AppState>, req: web::Json<RecordSentMatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let property = match state.postgres.get_property(req.property_id).await {
        Ok(property) => property,
        Err(e) => return store_error("Failed to fetch property", e),
    };
    let buyer = match state.postgres.get_buy_box(req.buyer_id).await {
        Ok(buyer) => buyer,
        Err(e) => return store_error("Failed to fetch buy box", e),
    };

    // score at send time; gated buyers have none
    let match_score = is_eligible(&buyer, property.kind).then(|| calculate_match_score(&property, &buyer).score);
    let status = req.status.unwrap_or(PropertyStatus::UnderReviewWithBuyer);

    let entry = match state
        .postgres
        .record_deal_log(property.id, buyer.buyer_id, match_score, status, req.notes.as_deref())
        .await
    {
        Ok(entry) => entry,
        Err(e) => return store_error("Failed to record deal log", e),
    };

    let mut status_changed = false;
    if let Some(explicit) = req.status {
        match state.postgres.update_property_status(property.id, explicit).await {
            Ok(()) => status_changed = status_change_affects_buyer_views(property.status, explicit),
            Err(e) => {
                tracing::warn!("Deal log recorded but status update for property {} failed: {}", property.id, e)
            }
        }
    }

    let crm_synced = match (&state.crm, &buyer.crm_contact_id) {
        (Some(crm), Some(contact_id)) => {
            let update = MatchSyncUpdate {
                contact_id: contact_id.clone(),
                property_id: property.id,
                match_score,
                status,
            };
            match crm.sync_match(&update).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Deal log recorded but CRM sync for buyer {} failed: {}", buyer.buyer_id, e);
                    false
                }
            }
        }
        _ => false,
    };

    if let Err(e) = state.cache.invalidate_matches(property.id, buyer.buyer_id).await {
        tracing::warn!("Failed to invalidate cache: {}", e);
    }
    // other buyers' lists may show this property, or must now drop it
    if status_changed {
        if let Err(e) = state.cache.invalidate_buyer_views().await {
            tracing::warn!("Failed to invalidate buyer views after status change: {}", e);
        }
    }

    tracing::info!(
        "Property {} sent to buyer {} (score {:?}, crm synced: {})",
        property.id,
        buyer.buyer_id,
        match_score,
        crm_synced
    );

    HttpResponse::Ok().json(RecordSentMatchResponse {
        success: true,
        deal_log_id: entry.id,
        match_score,
        crm_synced,
    })
}

/// Buyer views carry the property's status label and exclude closed deals,
/// so any change to the stored status makes them stale
#[inline]
fn status_change_affects_buyer_views(current: PropertyStatus, new: PropertyStatus) -> bool {
    current != new
}

/// Deal log entries for a property, newest first
///
/// GET /api/v1/properties/{id}/deal-log
async fn deal_log(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let property_id = path.into_inner();

    if let Err(e) = state.postgres.get_property(property_id).await {
        return store_error("Failed to fetch property", e);
    }

    match state.postgres.list_deal_logs(property_id).await {
        Ok(entries) => HttpResponse::Ok().json(DealLogResponse { property_id, entries }),
        Err(e) => store_error("Failed to fetch deal log", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_not_found_maps_to_404() {
        let response = store_error("Failed to fetch property", PostgresError::NotFound("property 9".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.status_code, 404);
        assert_eq!(error.message, "Not found: property 9");
    }

    #[test]
    fn test_invalid_row_maps_to_400() {
        let response = store_error("Failed to fetch buy box", PostgresError::InvalidInput("bad".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_change_invalidates_buyer_views() {
        assert!(status_change_affects_buyer_views(PropertyStatus::Submitted, PropertyStatus::Sold));
        assert!(status_change_affects_buyer_views(PropertyStatus::UnderReviewWithBuyer, PropertyStatus::Canceled));
        assert!(status_change_affects_buyer_views(PropertyStatus::Sold, PropertyStatus::Submitted));
        assert!(!status_change_affects_buyer_views(PropertyStatus::Sold, PropertyStatus::Sold));
    }

    #[test]
    fn test_sent_match_validation() {
        let req: RecordSentMatchRequest =
            serde_json::from_value(serde_json::json!({"propertyId": 0, "buyerId": 3})).unwrap();
        assert!(req.validate().is_err());

        let req: RecordSentMatchRequest = serde_json::from_value(serde_json::json!({
            "property_id": 1,
            "buyer_id": 3,
            "status": "buyer_approved"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.status, Some(PropertyStatus::BuyerApproved));
    }
}
