//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{
    AuthService, ServiceContainer, Services, StatementService, UserService,
};

/// Application state shared by every handler.
///
/// `database` and `cache` are `None` when serving from memory; handlers
/// and middleware skip what they need from a missing backend.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Statement service
    pub statement_service: Arc<dyn StatementService>,
    /// Redis cache
    pub cache: Option<Arc<Cache>>,
    /// Database connection
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Postgres-backed state, with Redis if it is reachable.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, Some(database), cache)
    }

    /// State with in-memory storage and no Redis.
    pub fn in_memory(config: Config) -> Self {
        Self::from_container(&Services::in_memory(config), None, None)
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        statement_service: Arc<dyn StatementService>,
        cache: Option<Arc<Cache>>,
        database: Option<Arc<Database>>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            statement_service,
            cache,
            database,
        }
    }

    fn from_container(
        container: &dyn ServiceContainer,
        database: Option<Arc<Database>>,
        cache: Option<Arc<Cache>>,
    ) -> Self {
        Self::new(
            container.auth(),
            container.users(),
            container.statements(),
            cache,
            database,
        )
    }
}
