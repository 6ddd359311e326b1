use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UpdateUser, User, UserResponse};
use crate::password;
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a user. The password is hashed before it reaches the repository.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        if self.repository.username_exists(&input.username).await? {
            return Err(UserError::UsernameTaken(input.username));
        }

        let hashed = password::hash(&input.password)?;
        let created = self
            .repository
            .create(NewUser::from_create(input, hashed))
            .await?;

        Ok(created.into())
    }

    pub async fn get_user(&self, id: i32) -> UserResult<UserResponse> {
        self.find(id).await.map(Into::into)
    }

    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Merge the supplied fields into the stored user; a new password is re-hashed.
    pub async fn update_user(&self, id: i32, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self.find(id).await?;

        let new_hash = match input.password.as_value() {
            Some(plaintext) => Some(password::hash(plaintext)?),
            None => None,
        };
        user.apply_update(input, new_hash);

        let updated = self
            .repository
            .update(user)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(updated.into())
    }

    /// Delete a user and return what was removed.
    pub async fn delete_user(&self, id: i32) -> UserResult<UserResponse> {
        let user = self.find(id).await?;

        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }

        Ok(user.into())
    }

    /// Check a username/password pair.
    ///
    /// Unknown user, inactive user and wrong password all yield
    /// [`UserError::InvalidCredentials`].
    pub async fn authenticate(&self, username: &str, plaintext: &str) -> UserResult<User> {
        let Some(user) = self.repository.get_by_username(username).await? else {
            tracing::debug!(username, "Login for unknown user");
            return Err(UserError::InvalidCredentials);
        };

        if !user.is_active {
            tracing::debug!(user_id = user.id, "Login for inactive user");
            return Err(UserError::InvalidCredentials);
        }

        if !password::verify(plaintext, &user.hashed_password) {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Resolve a token subject to an active user.
    pub async fn active_user(&self, username: &str) -> UserResult<User> {
        match self.repository.get_by_username(username).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(UserError::Unauthorized("user is inactive".into())),
            None => Err(UserError::Unauthorized("user not found".into())),
        }
    }

    async fn find(&self, id: i32) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::*;

    fn stored(username: &str, plaintext: &str, is_active: bool) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            hashed_password: password::hash(plaintext).unwrap(),
            is_active,
            is_superuser: false,
        }
    }

    fn create_input() -> CreateUser {
        serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "wonderland"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_username_exists()
            .with(eq("alice"))
            .returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|user: &NewUser| {
                user.hashed_password.starts_with("$argon2id$")
                    && password::verify("wonderland", &user.hashed_password)
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: 1,
                    username: user.username,
                    email: user.email,
                    hashed_password: user.hashed_password,
                    is_active: user.is_active,
                    is_superuser: user.is_superuser,
                })
            });

        let service = UserService::new(mock_repo);
        let created = service.create_user(create_input()).await.unwrap();

        assert_eq!(created.username, "alice");
        assert!(created.is_active);
        assert!(!created.is_superuser);
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_username_exists().returning(|_| Ok(true));
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let err = service.create_user(create_input()).await.unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken(_)));
    }

    #[tokio::test]
    async fn test_update_email_only_keeps_hash() {
        let original = stored("alice", "wonderland", true);
        let original_hash = original.hashed_password.clone();

        let mut mock_repo = MockUserRepository::new();
        let found = original.clone();
        mock_repo
            .expect_get_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo
            .expect_update()
            .withf(move |user: &User| {
                user.email == "new@x.com"
                    && user.username == "alice"
                    && user.hashed_password == original_hash
            })
            .returning(|user| Ok(Some(user)));

        let service = UserService::new(mock_repo);
        let update: UpdateUser = serde_json::from_str(r#"{"email": "new@x.com"}"#).unwrap();
        let updated = service.update_user(1, update).await.unwrap();

        assert_eq!(updated.email, "new@x.com");
    }

    #[tokio::test]
    async fn test_update_password_is_rehashed() {
        let original = stored("alice", "wonderland", true);

        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(original.clone())));
        mock_repo
            .expect_update()
            .withf(|user: &User| password::verify("looking-glass", &user.hashed_password))
            .returning(|user| Ok(Some(user)));

        let service = UserService::new(mock_repo);
        let update: UpdateUser =
            serde_json::from_str(r#"{"password": "looking-glass"}"#).unwrap();
        assert!(service.update_user(1, update).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);
        let err = service.update_user(9, UpdateUser::default()).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_user() {
        let user = stored("alice", "pw", true);

        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo.expect_delete().with(eq(1)).returning(|_| Ok(true));

        let service = UserService::new(mock_repo);
        let deleted = service.delete_user(1).await.unwrap();
        assert_eq!(deleted.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate() {
        let user = stored("alice", "wonderland", true);

        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_username()
            .with(eq("alice"))
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo
            .expect_get_by_username()
            .with(eq("mallory"))
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo);

        assert!(service.authenticate("alice", "wonderland").await.is_ok());
        assert!(matches!(
            service.authenticate("alice", "nope").await.unwrap_err(),
            UserError::InvalidCredentials
        ));
        assert!(matches!(
            service.authenticate("mallory", "wonderland").await.unwrap_err(),
            UserError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in_or_authorize() {
        let user = stored("alice", "wonderland", false);

        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(mock_repo);

        assert!(matches!(
            service.authenticate("alice", "wonderland").await.unwrap_err(),
            UserError::InvalidCredentials
        ));
        assert!(matches!(
            service.active_user("alice").await.unwrap_err(),
            UserError::Unauthorized(_)
        ));
    }
}
