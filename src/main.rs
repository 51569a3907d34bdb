use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod service;
mod store;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::service::clock::LocalClock;
use crate::service::lifecycle::{AttendanceLifecycle, LifecyclePolicy};
use crate::store::mysql::MySqlStore;
use chrono::Utc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Punchclock"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
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

    let pool = init_db(&config.database_url).await;

    let clock = LocalClock::from_east_hours(config.utc_offset_hours)
        .expect("UTC_OFFSET_HOURS out of range");
    let policy = LifecyclePolicy {
        min_shift_minutes: config.min_shift_minutes,
        stale_shift_hours: config.stale_shift_hours,
    };
    let lifecycle = AttendanceLifecycle::new(MySqlStore::new(pool.clone()), clock, policy);

    // Corrective sweeps: once at startup, then on the configured interval.
    let sweeper = lifecycle.clone();
    let sweep_interval = config.sweep_interval_secs;
    actix_web::rt::spawn(async move {
        loop {
            let now = Utc::now();
            if let Err(e) = sweeper.sweep_absentees(now).await {
                warn!(error = %e, "absentee sweep aborted");
            }
            if let Err(e) = sweeper.sweep_abandoned(now).await {
                warn!(error = %e, "abandoned-session sweep aborted");
            }
            if sweep_interval == 0 {
                break;
            }
            actix_web::rt::time::sleep(std::time::Duration::from_secs(sweep_interval)).await;
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(lifecycle.clone()))
            .app_data(Data::new(clock))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
