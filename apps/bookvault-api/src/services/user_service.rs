//! Registration, login and account details.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::JwtManager;
use crate::error::{ServiceError, ServiceResult};
use crate::password::PasswordHasher;
use bookvault_core::validation::{require_all, validate_email, validate_username};
use bookvault_core::{CoreError, UserView};
use bookvault_db::repository::user::{DETAILS_USER_COLUMN, EMAIL_COLUMN, USERNAME_COLUMN};
use bookvault_db::{Database, DbError};

#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
    hasher: PasswordHasher,
    jwt: Arc<JwtManager>,
}

impl UserService {
    pub fn new(db: Database, hasher: PasswordHasher, jwt: Arc<JwtManager>) -> Self {
        UserService { db, hasher, jwt }
    }

    /// Create an account. The first account ever created is the admin.
    ///
    /// Username is checked before email; a concurrent insert that slips past
    /// the checks is caught by the UNIQUE constraints and reported the same
    /// way.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> ServiceResult<UserView> {
        require_all(&[username, password, email])?;
        validate_username(username)?;
        validate_email(email)?;

        let users = self.db.users();
        if users.username_taken(username).await? {
            return Err(CoreError::UsernameExists(username.to_string()).into());
        }
        if users.email_taken(email).await? {
            return Err(CoreError::EmailExists(email.to_string()).into());
        }

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Password(e.to_string()))??;

        let user = users
            .insert(username, email, &hash)
            .await
            .map_err(|e| registration_conflict(e, username, email))?;

        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(UserView::new(user, None))
    }

    /// Verify credentials and issue a signed token.
    ///
    /// Unknown usernames still pay for one hash verification, and both
    /// failures return the same error.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<String> {
        require_all(&[username, password])?;

        let user = self.db.users().get_by_username(username).await?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|e| ServiceError::Password(e.to_string()))?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                warn!(username = %username, "Rejected login");
                return Err(CoreError::InvalidCredentials.into());
            }
        };

        let token = self.jwt.issue(user.id, &user.username, user.role)?;
        info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Attach the one-per-user details record.
    pub async fn create_details(
        &self,
        user_id: i64,
        full_name: &str,
        phone_number: &str,
    ) -> ServiceResult<UserView> {
        require_all(&[full_name, phone_number])?;

        let users = self.db.users();
        let user = users
            .get_by_id(user_id)
            .await?
            .ok_or(CoreError::UserNotFound(user_id))?;

        let details = users
            .insert_details(user_id, full_name, phone_number)
            .await
            .map_err(|e| {
                if e.is_unique_violation_on(DETAILS_USER_COLUMN) {
                    ServiceError::Core(CoreError::DetailsExist(user_id))
                } else {
                    ServiceError::Store(e)
                }
            })?;

        info!(user_id, "User details created");
        Ok(UserView::new(user, Some(details)))
    }

    pub async fn get_user(&self, user_id: i64) -> ServiceResult<UserView> {
        let users = self.db.users();
        let user = users
            .get_by_id(user_id)
            .await?
            .ok_or(CoreError::UserNotFound(user_id))?;
        let details = users.get_details(user_id).await?;

        Ok(UserView::new(user, details))
    }
}

fn registration_conflict(err: DbError, username: &str, email: &str) -> ServiceError {
    if err.is_unique_violation_on(USERNAME_COLUMN) {
        CoreError::UsernameExists(username.to_string()).into()
    } else if err.is_unique_violation_on(EMAIL_COLUMN) {
        CoreError::EmailExists(email.to_string()).into()
    } else {
        ServiceError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SystemClock;
    use crate::services::test_support::{core, memory_db};
    use bookvault_core::Role;

    async fn service() -> UserService {
        let db = memory_db().await;
        let hasher = PasswordHasher::new(argon2::Params::MIN_M_COST, 1).unwrap();
        let jwt = Arc::new(JwtManager::new("secret", 3600, Arc::new(SystemClock)));
        UserService::new(db, hasher, jwt)
    }

    #[tokio::test]
    async fn test_register_bootstraps_admin() {
        let svc = service().await;
        let alice = svc.register("alice", "pw", "a@x.com").await.unwrap();
        let bob = svc.register("bob", "pw", "b@x.com").await.unwrap();

        assert_eq!(alice.role, Role::Admin);
        assert_eq!(bob.role, Role::User);
    }

    #[tokio::test]
    async fn test_register_conflicts_and_empty_fields() {
        let svc = service().await;
        svc.register("alice", "pw", "a@x.com").await.unwrap();

        let err = core(svc.register("alice", "pw", "a@x.com").await.unwrap_err());
        assert!(matches!(err, CoreError::UsernameExists(_)));

        let err = core(svc.register("alice2", "pw", "a@x.com").await.unwrap_err());
        assert!(matches!(err, CoreError::EmailExists(_)));

        let err = core(svc.register("", "pw", "c@x.com").await.unwrap_err());
        assert!(matches!(err, CoreError::EmptyFields));

        let err = core(svc.register("carol smith", "pw", "c@x.com").await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));

        let err = core(svc.register("carol", "pw", "carol.example.com").await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login() {
        let svc = service().await;
        svc.register("alice", "pw", "a@x.com").await.unwrap();

        let token = svc.login("alice", "pw").await.unwrap();
        assert!(!token.is_empty());

        let err = core(svc.login("alice", "wrong").await.unwrap_err());
        assert!(matches!(err, CoreError::InvalidCredentials));

        let err = core(svc.login("nobody", "pw").await.unwrap_err());
        assert!(matches!(err, CoreError::InvalidCredentials));

        let err = core(svc.login("alice", "").await.unwrap_err());
        assert!(matches!(err, CoreError::EmptyFields));
    }

    #[tokio::test]
    async fn test_details() {
        let svc = service().await;
        let alice = svc.register("alice", "pw", "a@x.com").await.unwrap();

        let view = svc.get_user(alice.id).await.unwrap();
        assert_eq!(view.full_name, None);

        let view = svc.create_details(alice.id, "Alice Liddell", "555-0100").await.unwrap();
        assert_eq!(view.phone_number.as_deref(), Some("555-0100"));

        let err = core(svc.create_details(alice.id, "Again", "1").await.unwrap_err());
        assert!(matches!(err, CoreError::DetailsExist(_)));

        let err = core(svc.create_details(999, "Ghost", "1").await.unwrap_err());
        assert!(matches!(err, CoreError::UserNotFound(999)));

        let err = core(svc.get_user(999).await.unwrap_err());
        assert!(matches!(err, CoreError::UserNotFound(999)));

        let err = core(svc.create_details(alice.id, "", "1").await.unwrap_err());
        assert!(matches!(err, CoreError::EmptyFields));
    }
}
