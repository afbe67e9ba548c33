use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use hatake_api::app_state::AppState;
use hatake_api::background;
use hatake_api::config::Config;
use hatake_api::routes::configure_routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let host = config.app.host.clone();
    let port = config.app.port;
    let frontend_url = config.app.frontend_url.clone();
    let production = config.is_production();

    let state = AppState::initialize(config).await?;

    background::spawn_revocation_cleanup(&state);

    tracing::info!("listening on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = if production {
            Cors::default()
                .allowed_origin(&frontend_url)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(3600)
        } else {
            Cors::permissive()
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
