// Service exports
pub mod cache;
pub mod crm;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use crm::{CrmClient, CrmError, CustomFieldValue, MatchSyncUpdate};
pub use postgres::{PostgresClient, PostgresError};
