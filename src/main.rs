use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use vendor_bookings::config::Config;
use vendor_bookings::{db, routes};

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

    let (host, port) = config.bind_address();
    log::info!("Starting server at http://{host}:{port}");

    let pool_data = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
