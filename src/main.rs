use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use clap::Parser;
use dotenv::dotenv;
use resto_radar_backend::config::Config;
use resto_radar_backend::controller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let manager = PostgresConnectionManager::new_from_stringlike(
        &config.database_url,
        NoTls,
    ).context("Invalid postgres connection string")?;
    let postgres_connection = Pool::builder()
        .build(manager)
        .await
        .context("Failed to build the postgres connection pool")?;

    controller::serve(postgres_connection, &config).await
}
