use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::CrmSettings;
use crate::models::PropertyStatus;

/// Errors that can occur when syncing with the CRM
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API token")]
    Unauthorized,
}

/// One custom field write on a CRM contact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFieldValue {
    pub key: String,
    pub field_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateContactPayload<'a> {
    custom_fields: &'a [CustomFieldValue],
}

/// Match data pushed to a buyer's CRM contact
#[derive(Debug, Clone)]
pub struct MatchSyncUpdate {
    pub contact_id: String,
    pub property_id: i64,
    pub match_score: Option<f64>,
    pub status: PropertyStatus,
}

/// Contacts API client
///
/// Writes match score and deal status into custom fields on the buyer's
/// contact. Used best effort: callers log failures and carry on.
pub struct CrmClient {
    base_url: String,
    api_token: String,
    api_version: String,
    score_field_key: String,
    status_field_key: String,
    client: Client,
}

impl CrmClient {
    /// Create a new CRM client
    pub fn new(settings: &CrmSettings) -> Result<Self, CrmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
            api_version: settings.api_version.clone(),
            score_field_key: settings.score_field_key.clone(),
            status_field_key: settings.status_field_key.clone(),
            client,
        })
    }

    /// Write custom fields on a contact
    pub async fn update_custom_fields(&self, contact_id: &str, fields: &[CustomFieldValue]) -> Result<(), CrmError> {
        let url = format!("{}/contacts/{}", self.base_url, urlencoding::encode(contact_id));

        tracing::debug!("Updating {} custom fields on CRM contact {}", fields.len(), contact_id);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Version", &self.api_version)
            .header("Accept", "application/json")
            .json(&UpdateContactPayload { custom_fields: fields })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(CrmError::Unauthorized),
            StatusCode::NOT_FOUND => Err(CrmError::NotFound(format!("contact {}", contact_id))),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CrmError::ApiError(format!("Failed to update contact: {} {}", status, body)))
            }
        }
    }

    /// Push a sent match's score and status to the buyer's contact
    pub async fn sync_match(&self, update: &MatchSyncUpdate) -> Result<(), CrmError> {
        let fields = self.match_fields(update);
        self.update_custom_fields(&update.contact_id, &fields).await?;

        tracing::info!(
            "Synced property {} to CRM contact {}",
            update.property_id,
            update.contact_id
        );
        Ok(())
    }

    fn match_fields(&self, update: &MatchSyncUpdate) -> Vec<CustomFieldValue> {
        let mut fields = Vec::with_capacity(2);
        if let Some(score) = update.match_score {
            fields.push(CustomFieldValue {
                key: self.score_field_key.clone(),
                field_value: format!("{:.2}", score),
            });
        }
        fields.push(CustomFieldValue {
            key: self.status_field_key.clone(),
            field_value: update.status.as_str().to_string(),
        });
        fields
    }
}
