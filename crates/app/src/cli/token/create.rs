use clap::Args;
use jiff::Timestamp;
use pantry_app::auth::{PgAuthService, UserUuid};

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User UUID that should own the token
    #[arg(long)]
    user: UserUuid,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let expires_at = parse_expires_at(args.expires_at.as_deref())?;

    if let Some(expires_at) = expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgAuthService::new(db);

    let issued = service
        .issue_api_token(args.user, expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

fn parse_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid expires-at timestamp: {error}"))
    })
    .transpose()
}
