use huddle_api::{build_router, state::AppState};
use huddle_config::Settings;
use huddle_db::{connect, indexes::ensure_indexes};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "huddle_api=debug,huddle_services=debug,huddle_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!("Starting Huddle API on {}:{}", settings.app.host, settings.app.port);
    if !settings.identity.is_complete() {
        warn!(
            api_key = !settings.identity.api_key.is_empty(),
            project_id = !settings.identity.project_id.is_empty(),
            app_id = !settings.identity.app_id.is_empty(),
            "Identity provider config is incomplete; clients will not be able to sign in"
        );
    }
    if let Some(weakness) = settings.identity.verification_weakness() {
        anyhow::bail!("Refusing to start: ID tokens could be forged ({weakness})");
    }
    info!(
        offline_grace_secs = settings.presence.offline_grace_secs,
        drive_folder = %settings.drive.folder_id,
        "Presence and Drive config"
    );

    // Connect to MongoDB
    let db = connect(&settings).await?;

    // Ensure indexes
    ensure_indexes(&db).await?;

    // Build app state
    let app_state = AppState::new(db, settings.clone())?;

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
