use huddle_config::Settings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

async fn client_options(settings: &Settings) -> Result<ClientOptions, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&settings.database.url).await?;

    if let Some(max_pool) = settings.database.max_pool_size {
        client_options.max_pool_size = Some(max_pool);
    }
    if let Some(min_pool) = settings.database.min_pool_size {
        client_options.min_pool_size = Some(min_pool);
    }
    client_options.app_name = Some("huddle".to_string());

    Ok(client_options)
}

pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_options(client_options(settings).await?)?;

    // Verify connection
    client
        .database("admin")
        .run_command(bson::doc! { "ping": 1 })
        .await?;

    info!(db = %settings.database.name, "Connected to MongoDB");

    Ok(client.database(&settings.database.name))
}

/// Builds a database handle without pinging the server. The driver connects
/// on first use.
pub async fn connect_lazy(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_options(client_options(settings).await?)?;
    Ok(client.database(&settings.database.name))
}
