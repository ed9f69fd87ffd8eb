use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use hotel_bookings::{db, handlers, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config)
        .await
        .map_err(std::io::Error::other)?;

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = web::Data::new(AppState::new(pool));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
