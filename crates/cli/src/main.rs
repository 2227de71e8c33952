use anyhow::Context;
use clap::Parser;
use snackmatch_core::domain::profile::UserProfile;
use snackmatch_core::recommend::fallback::FallbackCatalog;
use snackmatch_core::recommend::SnackRecommender;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "snackmatch_cli")]
struct Args {
    /// Free-text mood or context to match a snack to.
    #[arg(long)]
    vibe: String,

    /// Path to a JSON user profile ({"dietary": [...], "allergies": [...], "favoriteTypes": [...]}).
    #[arg(long)]
    profile: Option<std::path::PathBuf>,

    /// Print the built-in fallback snack without calling any provider.
    #[arg(long)]
    offline: bool,

    /// Append the result to snack history (requires DATABASE_URL).
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = snackmatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    // stdout carries the JSON result.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let profile = args.profile.as_deref().map(read_profile).transpose()?;

    let snack = if args.offline {
        tracing::info!(offline = true, "skipping provider");
        FallbackCatalog::default().offline_snack()
    } else {
        let client = snackmatch_core::llm::client_from_settings(&settings)?;
        SnackRecommender::new(client)
            .generate_snack(&args.vibe, profile.as_ref())
            .await
    };

    if args.save {
        let db_url = settings.require_database_url()?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(1)
            .connect(db_url)
            .await
            .context("connect DATABASE_URL failed")?;
        snackmatch_core::storage::migrate(&pool).await?;

        let store = snackmatch_core::storage::PgKeyValueStore::new(pool);
        match snackmatch_core::storage::history::append(&store, snack.clone()).await {
            Ok(entry) => tracing::info!(id = %entry.id, "saved snack to history"),
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %format!("{err:#}"), "failed to save snack history");
            }
        }
    }

    let out = serde_json::to_string_pretty(&snack).context("failed to encode snack")?;
    println!("{out}");
    Ok(())
}

fn read_profile(path: &std::path::Path) -> anyhow::Result<UserProfile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid profile JSON in {}", path.display()))
}

fn init_sentry(settings: &snackmatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
