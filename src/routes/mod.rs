// Route exports
pub mod matches;

use actix_web::{error, http::StatusCode, web, HttpRequest};

pub use matches::AppState;

/// Malformed JSON bodies get the same error shape as handler failures
fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected JSON payload on {}: {}", req.path(), err);
    let response = matches::error_response(StatusCode::BAD_REQUEST, "Invalid JSON payload", &err);
    error::InternalError::from_response(err, response).into()
}

fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected query string on {}: {}", req.path(), err);
    let response = matches::error_response(StatusCode::BAD_REQUEST, "Invalid query string", &err);
    error::InternalError::from_response(err, response).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .configure(matches::configure),
    );
}
