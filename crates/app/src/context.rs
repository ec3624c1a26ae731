//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db, RoleCheckError},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        orders::{OrdersService, PgOrdersService, numbers::RandomOrderNumbers},
        payments::PaymentGateway,
        pricing::PricingPolicy,
        products::{PgProductsService, ProductsService},
        promo_codes::{PgPromoCodesService, PromoCodesService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role is not safe to serve requests with")]
    Role(#[from] RoleCheckError),
}

/// Checkout settings supplied by the server configuration.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub pricing: PricingPolicy,

    /// ISO currency code sent to the payment gateway.
    pub currency: String,
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub promo_codes: Arc<dyn PromoCodesService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the
    /// connected role bypasses row-level security.
    pub async fn from_database_url(
        url: &str,
        gateway: Arc<dyn PaymentGateway>,
        settings: CheckoutSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool).await?;

        let db = Db::new(pool.clone());

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            promo_codes: Arc::new(PgPromoCodesService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(
                db,
                gateway,
                Arc::new(RandomOrderNumbers),
                settings.pricing,
                settings.currency,
            )),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
