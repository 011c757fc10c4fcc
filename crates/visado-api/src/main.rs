use visado_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env if present; real environments set variables directly.
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize the application (database, storage, services, routes)
    let (_state, router) = visado_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    visado_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
