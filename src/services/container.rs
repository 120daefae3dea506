//! Service Container - Centralized service access.
//!
//! Wires every service to one shared unit of work, either Postgres-backed
//! or in-memory.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, StatementManager, StatementService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{MemoryPersistence, Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get statement service
    fn statements(&self) -> Arc<dyn StatementService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    statement_service: Arc<dyn StatementService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        statement_service: Arc<dyn StatementService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            statement_service,
        }
    }

    /// Services over a Postgres connection
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::with_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    /// Services over process-local storage; data is lost on exit
    pub fn in_memory(config: Config) -> Self {
        Self::with_unit_of_work(Arc::new(MemoryPersistence::new()), config)
    }

    fn with_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            statement_service: Arc::new(StatementManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn statements(&self) -> Arc<dyn StatementService> {
        self.statement_service.clone()
    }
}
