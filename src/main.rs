use clinicslot_api::config::ApiConfig;
use clinicslot_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Idempotent, so every start brings the schema up to date
    initialize_database(&db_pool).await?;

    clinicslot_api::start_server(config, db_pool).await?;

    Ok(())
}
