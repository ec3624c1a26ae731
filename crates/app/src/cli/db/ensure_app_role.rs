use clap::Args;
use shopfusion_app::database;
use sqlx::{Postgres, Transaction, query, query_scalar};

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Role the JSON API connects as
    #[arg(long, default_value = "shopfusion_app")]
    role_name: String,

    /// Password to set on the role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

const ROLE_FLAGS: &str = "LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    // Identifiers cannot be bound as parameters; let the server quote them.
    let role_ident = quote(&mut tx, "quote_ident", &args.role_name).await?;
    let password_lit = quote(&mut tx, "quote_literal", &args.password).await?;

    let role_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to check role existence: {error}"))?;

    let verb = if role_exists { "ALTER" } else { "CREATE" };

    let upsert_role_sql =
        format!("{verb} ROLE {role_ident} {ROLE_FLAGS} PASSWORD {password_lit}");

    query(&upsert_role_sql)
        .execute(&mut *tx)
        .await
        .map_err(|error| format!("failed to {} role: {error}", verb.to_lowercase()))?;

    let database_ident: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let grant_sql = [
        format!("GRANT CONNECT ON DATABASE {database_ident} TO {role_ident}"),
        format!("GRANT USAGE ON SCHEMA public TO {role_ident}"),
        format!(
            "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role_ident}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role_ident}"
        ),
    ];

    for sql in grant_sql {
        query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply `{sql}`: {error}"))?;
    }

    let bypasses_rls: bool =
        query_scalar("SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = $1")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to read role flags: {error}"))?;

    if bypasses_rls {
        return Err(format!(
            "role {} still bypasses row level security",
            args.role_name
        ));
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);
    println!("carts and orders are now scoped per user for this role");

    Ok(())
}

async fn quote(
    tx: &mut Transaction<'_, Postgres>,
    function: &str,
    value: &str,
) -> Result<String, String> {
    let sql = format!("SELECT {function}($1)");

    query_scalar(&sql)
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to {function}: {error}"))
}
