use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{
    dto::{normalize_email, CreateUserRequest, LoginRequest},
    errors::AuthError,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::{CreateUserError, UserStore},
    repo_types::{NewUser, User},
    validation::Validate,
};

/// Creates the account and returns a signed session token for it.
pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    mut req: CreateUserRequest,
) -> Result<String, AuthError> {
    req.email = normalize_email(&req.email);
    req.validate()?;

    // Ensure email is not taken
    if users.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash_password(req.password).await?;

    let user = users
        .create(NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            CreateUserError::DuplicateEmail => {
                warn!("email registered concurrently");
                AuthError::DuplicateEmail
            }
            CreateUserError::Other(e) => AuthError::Internal(e),
        })?;

    let token = keys.sign(user.id, &user.username)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

/// Checks the password first and only then signs a token.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    mut req: LoginRequest,
) -> Result<String, AuthError> {
    req.email = normalize_email(&req.email);
    req.validate()?;

    let user = users.find_by_email(&req.email).await?.ok_or_else(|| {
        warn!(email = %req.email, "login unknown email");
        AuthError::NotFound
    })?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.sign(user.id, &user.username)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn profile(users: &dyn UserStore, user_id: Uuid) -> Result<User, AuthError> {
    users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "profile for missing user");
        AuthError::NotFound
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::MemoryUserStore;
    use crate::config::JwtConfig;

    fn keys() -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "service-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 5,
        })
    }

    fn signup(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn creds(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_issues_token_for_new_user() {
        let store = MemoryUserStore::default();
        let keys = keys();
        let token = register(&store, &keys, signup("alice", "alice@example.com", "hunter22"))
            .await
            .expect("register");

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user.name, "alice");
        let stored = store.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, claims.user.id);
        assert_ne!(stored.password_hash, "hunter22");
    }

    #[tokio::test]
    async fn register_rejects_invalid_input_without_side_effects() {
        let store = MemoryUserStore::default();
        for req in [
            signup("al", "alice@example.com", "hunter22"),
            signup("alice", "not-an-email", "hunter22"),
            signup("alice", "alice@example.com", "1234"),
        ] {
            let err = register(&store, &keys(), req).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(ref v) if !v.is_empty()));
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn register_twice_keeps_one_record() {
        let store = MemoryUserStore::default();
        register(&store, &keys(), signup("alice", "alice@example.com", "hunter22"))
            .await
            .unwrap();
        let err = register(&store, &keys(), signup("alice2", "ALICE@example.com", "other-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(store.count_by_email("alice@example.com").await, 1);
    }

    #[tokio::test]
    async fn login_round_trip() {
        let store = MemoryUserStore::default();
        let keys = keys();
        register(&store, &keys, signup("alice", "alice@example.com", "hunter22"))
            .await
            .unwrap();

        let token = login(&store, &keys, creds("alice@example.com", "hunter22"))
            .await
            .expect("login");
        assert_eq!(keys.verify(&token).unwrap().user.name, "alice");
    }

    #[tokio::test]
    async fn login_wrong_password_yields_no_token() {
        let store = MemoryUserStore::default();
        register(&store, &keys(), signup("alice", "alice@example.com", "hunter22"))
            .await
            .unwrap();

        let res = login(&store, &keys(), creds("alice@example.com", "wrong-pass")).await;
        assert!(matches!(res, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() {
        let store = MemoryUserStore::default();
        let err = login(&store, &keys(), creds("ghost@example.com", "hunter22"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn login_validates_before_lookup() {
        let store = MemoryUserStore::default();
        let err = login(&store, &keys(), creds("ghost", "123")).await.unwrap_err();
        match err {
            AuthError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn profile_of_removed_user_is_not_found() {
        let store = MemoryUserStore::default();
        let keys = keys();
        let token = register(&store, &keys, signup("alice", "alice@example.com", "hunter22"))
            .await
            .unwrap();
        let id = keys.verify(&token).unwrap().user.id;

        assert_eq!(profile(&store, id).await.unwrap().username, "alice");
        store.remove(id).await;
        assert!(matches!(profile(&store, id).await, Err(AuthError::NotFound)));
    }
}
