//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    auth::{ApiTokenVersion, ParsedApiToken, build_verifier_input, verify_token_hash},
    uuids::TypedUuid,
};

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// What an authenticated caller may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Shops, manages their own cart and sees their own orders.
    Customer,

    /// Manages the catalog and every order.
    Admin,
}

impl Role {
    #[must_use]
    pub const fn from_is_admin(is_admin: bool) -> Self {
        if is_admin { Self::Admin } else { Self::Customer }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

/// The caller behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user: UserUuid,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub const fn customer(user: UserUuid) -> Self {
        Self {
            user,
            role: Role::Customer,
        }
    }

    #[must_use]
    pub const fn admin(user: UserUuid) -> Self {
        Self {
            user,
            role: Role::Admin,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User Record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

/// New User Data
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// API token data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    /// User that owns this API token.
    pub user_uuid: UserUuid,

    /// Token format/hash version.
    pub version: ApiTokenVersion,

    /// SHA-256 digest of the verifier input, hex encoded.
    pub token_hash: String,

    /// Role of the owning user.
    pub role: Role,
}

impl ActiveApiToken {
    /// Whether a presented token matches this record. The hash is rebuilt with the version the
    /// token was issued under, so a token presented under another version never verifies.
    pub(crate) fn verifies(&self, presented: &ParsedApiToken) -> bool {
        if presented.version != self.version {
            return false;
        }

        let input = build_verifier_input(
            &presented.token_uuid,
            self.version,
            &self.user_uuid,
            &presented.secret,
        );

        verify_token_hash(&input, &self.token_hash)
    }

    /// The caller this token authenticates as.
    pub(crate) fn identity(&self) -> Identity {
        Identity {
            user: self.user_uuid,
            role: self.role,
        }
    }
}

/// API token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewApiToken {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// API token issuance result with one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
