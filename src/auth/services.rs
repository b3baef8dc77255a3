use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::{
    errors::AuthError,
    jwt::{IssuedSession, SessionKeys},
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserStore,
    repo_types::{NewUser, PublicUser, DEFAULT_PHOTO, DEFAULT_ROLE},
};

/// Input of a registration, already deserialized by the transport layer.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub photo: Option<String>,
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: PublicUser,
    pub session: IssuedSession,
}

/// Credential & session service. Holds its store and signing keys explicitly
/// so tests can substitute an in-memory store.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: SessionKeys,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: SessionKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Stores a new user with a salted argon2 hash. Issues no session.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn register(&self, input: Registration) -> Result<PublicUser, AuthError> {
        let email = normalize_email(&input.email);

        // Friendly pre-check; the store's unique constraint is what actually holds.
        if self.store.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password_blocking(input.password).await?;
        let photo = input
            .photo
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PHOTO.to_string());

        let user = self
            .store
            .insert(NewUser {
                username: input.username,
                email,
                password_hash,
                photo,
                role: DEFAULT_ROLE.to_string(),
            })
            .await
            .map_err(|e| {
                let e = AuthError::from(e);
                if matches!(e, AuthError::DuplicateEmail) {
                    warn!("email registered concurrently");
                }
                e
            })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    /// Verifies credentials and signs a 5-day session token.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: String) -> Result<LoginSession, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let ok = verify_password_blocking(password, user.password_hash.clone()).await?;
        if !ok {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.keys.sign(user.id, &user.role)?;
        info!(user_id = %user.id, role = %user.role, "user logged in");
        Ok(LoginSession {
            user: user.into(),
            session,
        })
    }
}
