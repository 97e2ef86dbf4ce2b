//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, Identity, IssuedApiToken,
        NewApiToken, NewUser, UserRecord, UserUuid, build_verifier_input, format_api_token,
        generate_api_token_secret, hash_verifier_input, parse_api_token,
        repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
        }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::AlreadyExists`] if the email is taken, or a storage error.
    pub async fn create_user(&self, user: NewUser) -> Result<UserRecord, AuthServiceError> {
        self.repository
            .create_user(&user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the database insertion fails.
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let verifier_input = build_verifier_input(&token_uuid, version, &user_uuid, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid,
                version,
                token_hash: hash_verifier_input(&verifier_input),
                expires_at,
            })
            .await
            .map_err(AuthServiceError::from)?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user_uuid: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_user(user_uuid)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let parsed_token =
            parse_api_token(bearer_token).map_err(|_malformed| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token_by_uuid(parsed_token.token_uuid, parsed_token.version)
            .await
            .map_err(AuthServiceError::from)?
            .ok_or(AuthServiceError::NotFound)?;

        if !token.verifies(&parsed_token) {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await
        {
            warn!("failed to record api token use: {error}");
        }

        Ok(token.identity())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the identity that owns it.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;
}
