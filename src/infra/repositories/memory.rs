//! In-memory repositories used by `serve --in-memory` and by tests.
//!
//! Both stores are cheap handles over shared state, so a clone sees the
//! same data. Row locking is not modelled here; `MemoryPersistence`
//! serializes transactions instead.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StatementRepository, UserRepository};
use crate::domain::{NewStatement, NewUser, Statement, User};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn lock_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        // Mirrors the unique index on users.email
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("User"));
        }

        let user = User::new(new_user.name, new_user.email, new_user.password_hash);
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStatementStore {
    statements: Arc<RwLock<Vec<Statement>>>,
}

impl InMemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatementRepository for InMemoryStatementStore {
    async fn create(&self, new_statement: NewStatement) -> AppResult<Statement> {
        let statement = new_statement.into_statement();
        self.statements.write().await.push(statement.clone());
        Ok(statement)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Statement>> {
        let statements = self.statements.read().await;
        Ok(statements.iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Statement>> {
        let statements = self.statements.read().await;
        Ok(statements
            .iter()
            .filter(|s| s.belongs_to(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Jean".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_lookup_by_id_and_email() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("jean@email.com.br")).await.unwrap();

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "jean@email.com.br");

        let by_email = store.find_by_email("jean@email.com.br").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(store.find_by_email("other@email.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.create(new_user("jean@email.com.br")).await.unwrap();

        let result = store.create(new_user("jean@email.com.br")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_statements_listed_per_user_in_insertion_order() {
        let store = InMemoryStatementStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = store
            .create(NewStatement::deposit(alice, dec!(100), "salary"))
            .await
            .unwrap();
        store
            .create(NewStatement::deposit(bob, dec!(5), "gift"))
            .await
            .unwrap();
        let second = store
            .create(NewStatement::withdraw(alice, dec!(30), "rent"))
            .await
            .unwrap();

        let listed = store.list_by_user_id(alice).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryStatementStore::new();
        let handle = store.clone();
        let created = store
            .create(NewStatement::deposit(Uuid::new_v4(), dec!(1), "x"))
            .await
            .unwrap();

        assert!(handle.find_by_id(created.id).await.unwrap().is_some());
    }
}
