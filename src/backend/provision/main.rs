//! `pbchat-provision`: bootstrap the chat schema on a backend and seed a room.
//!
//! Requires `POCKETBASE_URL`, `POCKETBASE_ADMIN_EMAIL` and
//! `POCKETBASE_ADMIN_PASSWORD` (from the environment or `.env`).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pbchat::backend::auth::elevation::ElevatedSessionCache;
use pbchat::backend::provision::{
    ensure_schema, load_seed_messages, seed_messages, ProvisionError, DEFAULT_ROOM,
    DEFAULT_SEED_FILE,
};
use pbchat::backend::store::PocketBaseStore;
use pbchat::shared::{AppConfig, ConfigError};

const ADMIN_VARS: &str = "POCKETBASE_ADMIN_EMAIL / POCKETBASE_ADMIN_PASSWORD";

/// `pbchat-provision` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pbchat-provision",
    about = "Create the rooms/messages collections and seed demo messages",
    version
)]
struct CliArgs {
    /// Seed file: a JSON array of messages.
    #[arg(long = "seed", value_name = "path", default_value = DEFAULT_SEED_FILE)]
    seed: PathBuf,
    /// Title of the room to seed.
    #[arg(long = "room", value_name = "title", default_value = DEFAULT_ROOM)]
    room: String,
    /// Only ensure the schema; skip seeding.
    #[arg(long = "schema-only")]
    schema_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = CliArgs::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "Provisioning failed");
        return Err(e.into());
    }
    Ok(())
}

async fn run(args: CliArgs) -> Result<(), ProvisionError> {
    let config = AppConfig::from_env()?;
    let base = config
        .pocketbase_url
        .clone()
        .ok_or(ConfigError::MissingValue("POCKETBASE_URL"))?;
    if config.admin.is_none() {
        return Err(ConfigError::MissingValue(ADMIN_VARS).into());
    }

    let store = Arc::new(PocketBaseStore::new(base, config.request_timeout)?);
    let elevation = ElevatedSessionCache::new(store.clone(), config.admin.clone());

    let report = ensure_schema(store.as_ref(), &elevation).await?;
    tracing::info!(
        rooms = %report.rooms.info().id,
        messages = %report.messages.info().id,
        "Schema ready"
    );

    if args.schema_only {
        return Ok(());
    }

    let messages = load_seed_messages(&args.seed).await?;
    let report = seed_messages(store.as_ref(), &elevation, &args.room, &messages).await?;
    tracing::info!(
        room = %report.room.id,
        created = report.created,
        updated = report.updated,
        "Seed complete"
    );
    Ok(())
}
