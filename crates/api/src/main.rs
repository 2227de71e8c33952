use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snackmatch_core::domain::preferences::{FeedbackAction, PreferenceModel};
use snackmatch_core::domain::profile::UserProfile;
use snackmatch_core::domain::snack::SnackData;
use snackmatch_core::recommend::SnackRecommender;
use snackmatch_core::storage::history::HistoryEntry;
use snackmatch_core::storage::{self, KeyValueStore, MemoryKeyValueStore, PgKeyValueStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = snackmatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let client = snackmatch_core::llm::client_from_settings(&settings)?;
    let recommender = SnackRecommender::new(client);
    let store = connect_store(&settings).await;

    let state = AppState {
        recommender,
        store,
        write_lock: Arc::new(tokio::sync::Mutex::new(())),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/snacks", post(create_snack))
        .route("/history", get(get_history).delete(clear_history))
        .route(
            "/profile",
            get(get_profile).put(put_profile).delete(delete_profile),
        )
        .route("/preferences", get(get_preferences))
        .route("/feedback", post(post_feedback))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Postgres when it connects and migrates; otherwise a process-local store so the API keeps
/// serving snacks.
async fn connect_store(settings: &snackmatch_core::config::Settings) -> Arc<dyn KeyValueStore> {
    let db_url = match settings.require_database_url() {
        Ok(db_url) => db_url,
        Err(e) => {
            tracing::warn!(error = %e, "DATABASE_URL missing; using in-memory store");
            return Arc::new(MemoryKeyValueStore::new());
        }
    };

    match sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
    {
        Ok(pool) => match storage::migrate(&pool).await {
            Ok(()) => Arc::new(PgKeyValueStore::new(pool)),
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "db migrations failed; using in-memory store");
                Arc::new(MemoryKeyValueStore::new())
            }
        },
        Err(e) => {
            let err = anyhow::Error::new(e);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "db connect failed; using in-memory store");
            Arc::new(MemoryKeyValueStore::new())
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    recommender: SnackRecommender,
    store: Arc<dyn KeyValueStore>,
    // Whole-blob writes are read-modify-write.
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

#[derive(Debug, Deserialize)]
struct CreateSnackRequest {
    vibe: String,
    #[serde(default)]
    profile: Option<UserProfile>,
}

async fn create_snack(
    State(state): State<AppState>,
    Json(req): Json<CreateSnackRequest>,
) -> Result<Json<SnackData>, StatusCode> {
    let vibe = req.vibe.trim();
    if vibe.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let snack = state
        .recommender
        .generate_snack(vibe, req.profile.as_ref())
        .await;

    let _guard = state.write_lock.lock().await;
    if let Err(e) = storage::history::append(state.store.as_ref(), snack.clone()).await {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "failed to record snack history");
    }

    Ok(Json(snack))
}

async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(storage::history::load(state.store.as_ref()).await)
}

async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    let _guard = state.write_lock.lock().await;
    storage::history::clear(state.store.as_ref())
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, StatusCode> {
    let profile = storage::profile::load(state.store.as_ref())
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(profile))
}

async fn put_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<StatusCode, StatusCode> {
    storage::profile::save(state.store.as_ref(), &profile)
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_profile(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    storage::profile::clear(state.store.as_ref())
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_preferences(
    State(state): State<AppState>,
) -> Result<Json<PreferenceModel>, StatusCode> {
    let model = storage::preferences::load(state.store.as_ref())
        .await
        .map_err(internal_error)?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    snack_name: String,
    action: FeedbackAction,
}

async fn post_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<PreferenceModel>, StatusCode> {
    let _guard = state.write_lock.lock().await;
    let model =
        storage::preferences::record_feedback(state.store.as_ref(), &req.snack_name, req.action)
            .await
            .map_err(internal_error)?;
    Ok(Json(model))
}

fn internal_error(e: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&e);
    tracing::error!(error = %format!("{e:#}"), "storage request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
