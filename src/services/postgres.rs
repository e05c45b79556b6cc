use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::core::BuyerPoolQuery;
use crate::models::{
    AssetType, BuyerCriteria, DealLogEntry, ExitStrategy, LandType, LotSizeUnit, NumericRange, PropertyKind,
    PropertyListing, PropertyStatus,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

const PROPERTY_COLUMNS: &str = r#"
    p.id,
    p.address,
    lt.value AS land_type,
    p.lot_size::float8 AS lot_size,
    p.lot_size_unit,
    p.agreed_price::float8 AS agreed_price,
    p.exit_strategy,
    p.zoning,
    p.property_characteristics,
    p.location_characteristics,
    p.property_kind,
    p.status
"#;

const BUY_BOX_COLUMNS: &str = r#"
    b.id AS buyer_id,
    b.name AS buyer_name,
    b.crm_contact_id,
    f.asset_type,
    f.is_active_buyer,
    f.is_blacklisted,
    f.preferred_location,
    f.land_property_types,
    f.land_strategies,
    f.lot_size_min::float8 AS lot_size_min,
    f.lot_size_max::float8 AS lot_size_max,
    f.price_min::float8 AS price_min,
    f.price_max::float8 AS price_max,
    f.zoning,
    f.strict_requirements,
    f.location_characteristics,
    f.property_characteristics,
    f.notes
"#;

#[derive(Debug, sqlx::FromRow)]
struct PropertyRow {
    id: i64,
    address: String,
    land_type: Option<String>,
    lot_size: Option<f64>,
    lot_size_unit: String,
    agreed_price: Option<f64>,
    exit_strategy: Option<String>,
    zoning: Option<String>,
    property_characteristics: Json<Vec<String>>,
    location_characteristics: Json<Vec<String>>,
    property_kind: String,
    status: String,
}

impl TryFrom<PropertyRow> for PropertyListing {
    type Error = PostgresError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(PropertyListing {
            id: row.id,
            address: row.address,
            land_type: row.land_type.as_deref().map(LandType::new).filter(|t| !t.is_empty()),
            lot_size: row.lot_size,
            lot_size_unit: LotSizeUnit::from_str(&row.lot_size_unit).map_err(PostgresError::InvalidInput)?,
            agreed_price: row.agreed_price,
            exit_strategy: row
                .exit_strategy
                .filter(|s| !s.trim().is_empty())
                .map(ExitStrategy::from),
            zoning: row.zoning,
            property_characteristics: row.property_characteristics.0.into_iter().collect(),
            location_characteristics: row.location_characteristics.0.into_iter().collect(),
            status: PropertyStatus::from_str(&row.status).map_err(PostgresError::InvalidInput)?,
            kind: PropertyKind::from_str(&row.property_kind).map_err(PostgresError::InvalidInput)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BuyBoxRow {
    buyer_id: i64,
    buyer_name: Option<String>,
    crm_contact_id: Option<String>,
    asset_type: String,
    is_active_buyer: bool,
    is_blacklisted: bool,
    preferred_location: Option<String>,
    land_property_types: Json<Vec<String>>,
    land_strategies: Json<Vec<String>>,
    lot_size_min: Option<f64>,
    lot_size_max: Option<f64>,
    price_min: Option<f64>,
    price_max: Option<f64>,
    zoning: Json<Vec<String>>,
    strict_requirements: Json<Vec<String>>,
    location_characteristics: Json<Vec<String>>,
    property_characteristics: Json<Vec<String>>,
    notes: Option<String>,
}

impl TryFrom<BuyBoxRow> for BuyerCriteria {
    type Error = PostgresError;

    fn try_from(row: BuyBoxRow) -> Result<Self, Self::Error> {
        let land_property_types: BTreeSet<LandType> = row
            .land_property_types
            .0
            .iter()
            .map(|t| LandType::new(t))
            .filter(|t| !t.is_empty())
            .collect();
        let land_strategies: BTreeSet<ExitStrategy> = row
            .land_strategies
            .0
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| ExitStrategy::from(s.as_str()))
            .collect();

        Ok(BuyerCriteria {
            buyer_id: row.buyer_id,
            buyer_name: row.buyer_name,
            crm_contact_id: row.crm_contact_id.filter(|id| !id.trim().is_empty()),
            asset_type: AssetType::from_str(&row.asset_type).map_err(PostgresError::InvalidInput)?,
            is_active_buyer: row.is_active_buyer,
            is_blacklisted: row.is_blacklisted,
            preferred_location: row.preferred_location,
            land_property_types,
            land_strategies,
            lot_size: NumericRange::new(row.lot_size_min, row.lot_size_max),
            price: NumericRange::new(row.price_min, row.price_max),
            zoning: row.zoning.0.into_iter().collect(),
            strict_requirements: row.strict_requirements.0.into_iter().collect(),
            location_characteristics: row.location_characteristics.0.into_iter().collect(),
            property_characteristics: row.property_characteristics.0.into_iter().collect(),
            notes: row.notes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DealLogRow {
    id: uuid::Uuid,
    property_id: i64,
    buyer_id: i64,
    match_score: Option<f64>,
    status: String,
    notes: Option<String>,
    sent_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<DealLogRow> for DealLogEntry {
    type Error = PostgresError;

    fn try_from(row: DealLogRow) -> Result<Self, Self::Error> {
        Ok(DealLogEntry {
            id: row.id,
            property_id: row.property_id,
            buyer_id: row.buyer_id,
            match_score: row.match_score,
            status: PropertyStatus::from_str(&row.status).map_err(PostgresError::InvalidInput)?,
            notes: row.notes,
            sent_at: row.sent_at,
        })
    }
}

/// Converts rows, skipping (and logging) any that fail to map.
/// One malformed record must not take down a whole pool scan.
fn convert_rows<R, T>(rows: Vec<R>, what: &str) -> Vec<T>
where
    T: TryFrom<R, Error = PostgresError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping malformed {} row: {}", what, e);
                None
            }
        })
        .collect()
}

/// Status values excluded from the matchable property pool
fn closed_statuses() -> Vec<String> {
    [PropertyStatus::Sold, PropertyStatus::Canceled]
        .iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

/// PostgreSQL store for properties, buy boxes and the deal log
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max {} connections)",
            settings.max_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }

    /// Load one property submission
    pub async fn get_property(&self, property_id: i64) -> Result<PropertyListing, PostgresError> {
        let query = format!(
            "SELECT {} FROM property_submissions p \
             LEFT JOIN land_types lt ON lt.id = p.land_type_id \
             WHERE p.id = $1",
            PROPERTY_COLUMNS
        );

        let row: Option<PropertyRow> = sqlx::query_as(&query)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| PostgresError::NotFound(format!("property {}", property_id)))?
            .try_into()
    }

    /// Load one buyer's buy box
    pub async fn get_buy_box(&self, buyer_id: i64) -> Result<BuyerCriteria, PostgresError> {
        let query = format!(
            "SELECT {} FROM buyer_profiles b \
             JOIN buy_box_filters f ON f.buyer_id = b.id \
             WHERE b.id = $1",
            BUY_BOX_COLUMNS
        );

        let row: Option<BuyBoxRow> = sqlx::query_as(&query)
            .bind(buyer_id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| PostgresError::NotFound(format!("buy box for buyer {}", buyer_id)))?
            .try_into()
    }

    /// Load every buy box that passes the eligibility gate for a property kind
    ///
    /// The gate is pushed into SQL; the matcher re-applies it in memory.
    pub async fn fetch_eligible_buy_boxes(&self, pool_query: &BuyerPoolQuery) -> Result<Vec<BuyerCriteria>, PostgresError> {
        let query = format!(
            "SELECT {} FROM buyer_profiles b \
             JOIN buy_box_filters f ON f.buyer_id = b.id \
             WHERE f.is_active_buyer AND NOT f.is_blacklisted \
             AND f.asset_type = ANY($1) \
             ORDER BY b.id",
            BUY_BOX_COLUMNS
        );

        let rows: Vec<BuyBoxRow> = sqlx::query_as(&query)
            .bind(pool_query.asset_type_values())
            .fetch_all(&self.pool)
            .await?;

        let buyers = convert_rows(rows, "buy box");
        tracing::debug!("Loaded {} eligible buy boxes", buyers.len());

        Ok(buyers)
    }

    /// Load every property still on offer to buyers
    pub async fn fetch_matchable_properties(&self) -> Result<Vec<PropertyListing>, PostgresError> {
        let query = format!(
            "SELECT {} FROM property_submissions p \
             LEFT JOIN land_types lt ON lt.id = p.land_type_id \
             WHERE p.status <> ALL($1) \
             ORDER BY p.id",
            PROPERTY_COLUMNS
        );

        let rows: Vec<PropertyRow> = sqlx::query_as(&query)
            .bind(closed_statuses())
            .fetch_all(&self.pool)
            .await?;

        let properties = convert_rows(rows, "property");
        tracing::debug!("Loaded {} matchable properties", properties.len());

        Ok(properties)
    }

    /// Move a property along the deal pipeline
    pub async fn update_property_status(&self, property_id: i64, status: PropertyStatus) -> Result<(), PostgresError> {
        let result = sqlx::query("UPDATE property_submissions SET status = $2 WHERE id = $1")
            .bind(property_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::NotFound(format!("property {}", property_id)));
        }

        tracing::debug!("Property {} status -> {}", property_id, status.as_str());
        Ok(())
    }

    /// Record that a property was sent to a buyer
    pub async fn record_deal_log(
        &self,
        property_id: i64,
        buyer_id: i64,
        match_score: Option<f64>,
        status: PropertyStatus,
        notes: Option<&str>,
    ) -> Result<DealLogEntry, PostgresError> {
        let query = r#"
            INSERT INTO deal_logs (id, property_id, buyer_id, match_score, status, notes, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, property_id, buyer_id, match_score, status, notes, sent_at
        "#;

        let row: DealLogRow = sqlx::query_as(query)
            .bind(uuid::Uuid::new_v4())
            .bind(property_id)
            .bind(buyer_id)
            .bind(match_score)
            .bind(status.as_str())
            .bind(notes)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Recorded deal log: property {} -> buyer {}", property_id, buyer_id);

        row.try_into()
    }

    /// Deal log entries for a property, newest first
    pub async fn list_deal_logs(&self, property_id: i64) -> Result<Vec<DealLogEntry>, PostgresError> {
        let query = r#"
            SELECT id, property_id, buyer_id, match_score, status, notes, sent_at
            FROM deal_logs
            WHERE property_id = $1
            ORDER BY sent_at DESC
        "#;

        let rows: Vec<DealLogRow> = sqlx::query_as(query)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(convert_rows(rows, "deal log"))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
