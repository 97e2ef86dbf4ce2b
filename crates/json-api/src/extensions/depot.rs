//! Depot helper extensions.

use std::any::Any;

use pantry_app::auth::Identity;
use salvo::prelude::{Depot, StatusError};

/// Typed access to request-scoped values, mapping misses to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the caller resolved by the authentication hoop.
    fn insert_identity(&mut self, identity: Identity);

    /// The authenticated caller, or 401 when no hoop ran.
    fn identity_or_401(&self) -> Result<Identity, StatusError>;

    /// The authenticated caller if they are an administrator, 403 otherwise.
    fn admin_or_403(&self) -> Result<Identity, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<Identity, StatusError> {
        self.obtain::<Identity>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }

    fn admin_or_403(&self) -> Result<Identity, StatusError> {
        let identity = self.identity_or_401()?;

        if !identity.is_admin() {
            return Err(StatusError::forbidden().brief("Administrator access required"));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use pantry_app::auth::UserUuid;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn test_missing_identity_is_401() {
        let depot = Depot::new();

        let error = depot.identity_or_401().err();

        assert_eq!(error.map(|e| e.code), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_customer_is_not_admin() {
        let mut depot = Depot::new();

        depot.insert_identity(Identity::customer(UserUuid::new()));

        assert!(depot.identity_or_401().is_ok());
        assert_eq!(
            depot.admin_or_403().err().map(|e| e.code),
            Some(StatusCode::FORBIDDEN)
        );
    }

    #[test]
    fn test_admin_passes() {
        let mut depot = Depot::new();
        let admin = Identity::admin(UserUuid::new());

        depot.insert_identity(admin);

        assert_eq!(depot.admin_or_403().ok(), Some(admin));
    }
}
