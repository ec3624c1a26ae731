use clap::Args;
use shopfusion_app::{
    auth::PgAuthService,
    database::{self, Db},
    domain::users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// Mark the email as already verified
    #[arg(long)]
    verified: bool,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(Db::new(pool.clone()))
        .create_user(NewUser {
            uuid: args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid),
            email: args.email,
            is_verified: args.verified,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(user.uuid)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("is_verified: {}", user.is_verified);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
