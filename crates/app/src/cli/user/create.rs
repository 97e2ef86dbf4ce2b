use clap::Args;
use pantry_app::auth::{NewUser, PgAuthService, Role, UserUuid};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login email, unique across users
    #[arg(long)]
    email: String,

    /// Grant catalog and order administration
    #[arg(long)]
    admin: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.email.trim().is_empty() {
        return Err("email cannot be empty".to_string());
    }

    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgAuthService::new(db);

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: args.name,
            email: args.email,
            role: Role::from_is_admin(args.admin),
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);
    println!("user_email: {}", user.email);
    println!("user_role: {:?}", user.role);

    Ok(())
}
