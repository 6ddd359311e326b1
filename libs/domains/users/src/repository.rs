use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by id
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>>;

    async fn username_exists(&self, username: &str) -> UserResult<bool>;

    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Persist every field of `user`; `None` when the row is gone
    async fn update(&self, user: User) -> UserResult<Option<User>>;

    /// Returns true when a row was removed
    async fn delete(&self, id: i32) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i32, User>,
    next_id: i32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let store = self.state.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let store = self.state.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let store = self.state.read().await;
        Ok(store.users.values().find(|u| u.username == username).cloned())
    }

    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        let store = self.state.read().await;
        Ok(store.users.values().any(|u| u.username == username))
    }

    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.state.write().await;

        if store.users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameTaken(user.username));
        }

        store.next_id += 1;
        let user = User {
            id: store.next_id,
            username: user.username,
            email: user.email,
            hashed_password: user.hashed_password,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        };
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<Option<User>> {
        let mut store = self.state.write().await;

        if !store.users.contains_key(&user.id) {
            return Ok(None);
        }
        if store
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::UsernameTaken(user.username));
        }

        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Updated user");
        Ok(Some(user))
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let mut store = self.state.write().await;
        let removed = store.users.remove(&id).is_some();

        if removed {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            hashed_password: "hash".to_string(),
            is_active: true,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice")).await.unwrap();

        let err = repo.create(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryUserRepository::new();
        let mut alice = repo.create(new_user("alice")).await.unwrap();
        let bob = repo.create(new_user("bob")).await.unwrap();

        alice.email = "a@x.com".into();
        let updated = repo.update(alice.clone()).await.unwrap().unwrap();
        assert_eq!(updated.email, "a@x.com");

        let mut renamed = bob.clone();
        renamed.username = "alice".into();
        assert!(matches!(
            repo.update(renamed).await.unwrap_err(),
            UserError::UsernameTaken(_)
        ));

        assert!(repo.delete(bob.id).await.unwrap());
        assert!(!repo.delete(bob.id).await.unwrap());
        assert!(repo.update(bob).await.unwrap().is_none());
    }
}
