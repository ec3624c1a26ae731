//! Test context for service-level integration tests.

use std::sync::Arc;

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::Db,
    domain::{
        carts::PgCartsService,
        checkout::PgCheckoutService,
        orders::{PgOrdersService, numbers::RandomOrderNumbers},
        payments::UnconfiguredGateway,
        pricing::PricingPolicy,
        products::PgProductsService,
        promo_codes::PgPromoCodesService,
        users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
    },
};

use super::db::TestDb;

/// Name of the non-superuser app role used for RLS testing.
const APP_ROLE: &str = "shopfusion_app_test";
const APP_ROLE_PASSWORD: &str = "shopfusion_app_test_pass";

pub(crate) struct TestContext {
    /// Connected as the restricted app role, so RLS applies.
    pub db: Db,
    pub test_db: TestDb,
    pub user_uuid: UserUuid,
    pub user_email: String,
    pub users: PgUsersService,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub promo_codes: PgPromoCodesService,
    pub orders: PgOrdersService,
    pub checkout: PgCheckoutService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;

        let app_pool = Self::setup_app_pool(&test_db).await;
        let db = Db::new(app_pool);

        let users = PgUsersService::new(db.clone());
        let user_email = "customer@example.com".to_string();

        let user = users
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: user_email.clone(),
                is_verified: true,
            })
            .await
            .expect("Failed to create default test user");

        let checkout = PgCheckoutService::new(
            db.clone(),
            Arc::new(UnconfiguredGateway),
            Arc::new(RandomOrderNumbers),
            PricingPolicy::default(),
            "INR".to_string(),
        );

        Self {
            user_uuid: user.uuid,
            user_email,
            users,
            products: PgProductsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            promo_codes: PgPromoCodesService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            checkout,
            db,
            test_db,
        }
    }

    /// Create another customer, for isolation and contention tests.
    pub async fn create_user(&self, email: &str, is_verified: bool) -> UserUuid {
        self.users
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: email.to_string(),
                is_verified,
            })
            .await
            .expect("Failed to create test user")
            .uuid
    }

    /// Create the app role (once per server) and return a pool connected as it.
    ///
    /// Superusers bypass RLS even with `FORCE ROW LEVEL SECURITY`.
    async fn setup_app_pool(test_db: &TestDb) -> PgPool {
        let su_url = &test_db.superuser_url;

        // Roles are server-scoped, so create it from the maintenance database.
        let postgres_url = su_url.rsplit_once('/').map(|x| x.0).unwrap_or(su_url);
        let postgres_url = format!("{postgres_url}/postgres");

        let mut server_conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to postgres database for role setup");

        // Parallel tests race here; 42710 and 23505 both mean the role exists.
        let create_result = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE NOBYPASSRLS"
        ))
        .execute(&mut server_conn)
        .await;

        if let Err(sqlx::Error::Database(ref e)) = create_result {
            if !matches!(e.code().as_deref(), Some("42710") | Some("23505")) {
                create_result.expect("Failed to create app role");
            }
        } else {
            create_result.expect("Failed to create app role");
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            test_db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        let mut db_conn = PgConnection::connect(su_url)
            .await
            .expect("Failed to connect to test database for privilege setup");

        for stmt in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!(
                "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"
            ),
            format!("GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {APP_ROLE}"),
        ] {
            query(&stmt)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant table privileges to app role");
        }

        db_conn
            .close()
            .await
            .expect("Failed to close db connection");

        let app_url = su_url.replacen(
            "shopfusion_test:shopfusion_test_password",
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}
