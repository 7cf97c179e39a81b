use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dompet={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let http = settings.server;
    let db = connect_database(&http.database_url).await?;

    let mut builder = engine::Engine::builder().database(db);
    if let Some(cost) = http.password_cost {
        builder = builder.password_cost(cost);
    }
    let engine = builder.build().await?;

    let addr = format!("{}:{}", http.bind, http.port);
    let config = server::ServerConfig {
        jwt_secret: http.jwt_secret,
        cors_origins: http.cors_origins,
    };
    server::run(engine, config, &addr).await?;

    Ok(())
}

async fn connect_database(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("connecting to database...");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
