use dotenv::dotenv;
use expenses_db_init::config::Config;
use expenses_db_init::database::MongoDB;
use expenses_db_init::{schema, status};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = run().await {
        log::error!("❌ Database initialization failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    log::info!("🚀 Starting database initialization...");
    log::info!("📊 Database: {} at {}", config.database_name, config.redacted_uri());

    let db = MongoDB::connect(&config).await?;
    log::info!("✅ MongoDB connected successfully");

    let report = schema::bootstrap(&db).await?;
    schema::verify(&db).await?;

    log::info!(
        "✅ {} collections ({} new), {} indexes ready",
        report.collections.len(),
        report.created_collections(),
        report.indexes.len()
    );

    db.shutdown().await;

    status::emit_status(&mut std::io::stdout().lock())?;

    Ok(())
}
