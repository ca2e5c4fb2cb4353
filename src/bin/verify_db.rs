//! Prints every stored application.

use application_portal::{
    config::Config,
    database::pool::create_pool,
    services::application_store::{ApplicationStore, SqliteApplicationStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    let store = SqliteApplicationStore::new(pool);

    let applications = store.list_all().await?;
    println!("--- Database Content ---");
    if applications.is_empty() {
        println!("No applications found in the database.");
    } else {
        for application in &applications {
            println!("{}", serde_json::to_string_pretty(application)?);
        }
    }
    println!("------------------------");

    store.pool().close().await;
    Ok(())
}
