use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::storage::ObjectStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cache: Arc<ResponseCache>,
    pub storage: Arc<ObjectStorage>,
    pub config: Arc<AppConfig>,
}
