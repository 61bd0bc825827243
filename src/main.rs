use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use moodmaps_server::auth::handlers::{login, me, register, verify_email};
use moodmaps_server::{health_check, AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> moodmaps_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!(
        "Starting server at {}:{}",
        config.server.host, config.server.port
    );

    // Initialize application state (connects to the store, runs migrations)
    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    HttpServer::new(move || {
        App::new().app_data(state.clone()).service(
            web::scope("/api")
                .route("/", web::get().to(health_check))
                .route("/auth/register", web::post().to(register))
                .route("/auth/login", web::post().to(login))
                .route("/auth/verify-email", web::post().to(verify_email))
                .route("/auth/me", web::get().to(me)),
        )
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
