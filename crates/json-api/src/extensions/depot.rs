//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use shopfusion_app::{auth::AuthenticatedUser, domain::users::records::UserUuid};

const AUTHENTICATED_USER_DEPOT_KEY: &str = "authenticated_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_authenticated_user(&mut self, user: AuthenticatedUser);

    fn authenticated_user(&self) -> Option<AuthenticatedUser>;

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;

    /// Only users with a verified email may place orders.
    fn verified_user_or_403(&self) -> Result<UserUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_authenticated_user(&mut self, user: AuthenticatedUser) {
        self.insert(AUTHENTICATED_USER_DEPOT_KEY, user);
    }

    fn authenticated_user(&self) -> Option<AuthenticatedUser> {
        self.get::<AuthenticatedUser>(AUTHENTICATED_USER_DEPOT_KEY)
            .ok()
            .copied()
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.authenticated_user()
            .map(|user| user.uuid)
            .ok_or_else(StatusError::unauthorized)
    }

    fn verified_user_or_403(&self) -> Result<UserUuid, StatusError> {
        let user = self
            .authenticated_user()
            .ok_or_else(StatusError::unauthorized)?;

        if !user.is_verified {
            return Err(StatusError::forbidden().brief("Email verification required"));
        }

        Ok(user.uuid)
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use uuid::Uuid;

    use super::*;

    fn user(is_verified: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            uuid: UserUuid::from_uuid(Uuid::nil()),
            is_verified,
        }
    }

    #[test]
    fn missing_user_is_unauthorized() {
        let depot = Depot::new();

        assert_eq!(
            depot.user_uuid_or_401().err().map(|error| error.code),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            depot.verified_user_or_403().err().map(|error| error.code),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn unverified_user_is_forbidden_from_verified_routes() {
        let mut depot = Depot::new();

        depot.insert_authenticated_user(user(false));

        assert!(depot.user_uuid_or_401().is_ok());
        assert_eq!(
            depot.verified_user_or_403().err().map(|error| error.code),
            Some(StatusCode::FORBIDDEN)
        );
    }

    #[test]
    fn verified_user_passes() {
        let mut depot = Depot::new();

        depot.insert_authenticated_user(user(true));

        assert_eq!(
            depot.verified_user_or_403().ok(),
            Some(UserUuid::from_uuid(Uuid::nil()))
        );
    }
}
