use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use pushkind_common::db::establish_connection_pool;
use pushkind_common::models::config::CommonServerConfig;

use storefront_products::config::ServerConfig;
use storefront_products::repository::DieselRepository;
use storefront_products::routes::configure_product_routes;
use storefront_products::uploads::{PUBLIC_UPLOADS_PATH, UploadStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret {
        Some(key) => Key::from(key.as_bytes()),
        None => Key::generate(),
    };

    let common_config = CommonServerConfig {
        secret: config.secret.clone().unwrap_or_default(),
        auth_service_url: config.auth_service_url.clone(),
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    std::fs::create_dir_all(&config.upload_dir)?;
    let uploads = UploadStore::new(config.upload_dir.clone());

    let domain = config.domain.clone();
    let api_url = config.api_url.clone();
    log::info!(
        "Serving products under {api_url}/products on {}:{}",
        config.address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new(PUBLIC_UPLOADS_PATH, uploads.dir()))
            .service(web::scope(&api_url).configure(configure_product_routes))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(uploads.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
