use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use std::time::Duration;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod gateway;
mod model;
mod models;
mod routes;
mod utils;

use config::Config;
use db::{init_db, run_migrations};

use crate::docs::ApiDoc;
use crate::gateway::{Gateway, bucket::StorageBucket, mysql::MySqlStore};
use crate::utils::{location_cache::LocationSlots, token_revocation::TokenRevocations};
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    // Reads go through the restricted connection, writes through the admin one
    let read_pool = init_db(&config.database_url).await?;
    let admin_pool = init_db(&config.database_admin_url).await?;

    if config.run_migrations {
        run_migrations(&admin_pool).await?;
        info!("Migrations applied");
    }

    let bucket = StorageBucket::new(
        &config.storage_url,
        &config.photo_bucket,
        &config.storage_service_key,
    );

    let gateway = Gateway::new(
        Arc::new(MySqlStore::new(read_pool)),
        Arc::new(MySqlStore::new(admin_pool)),
        Arc::new(bucket),
        config.settings_policy,
    );
    let slots = LocationSlots::new(Duration::from_secs(config.location_ttl_secs));
    let revocations = TokenRevocations::new(Duration::from_secs(config.access_token_ttl as u64));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(gateway.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(slots.clone()))
            .app_data(Data::new(revocations.clone()))
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
