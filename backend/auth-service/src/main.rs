/// Auth Service - HTTP Server
///
/// Account authentication and session-token lifecycle for CampusHub.
use actix_web::{middleware as web_middleware, web, App, HttpResponse, HttpServer};
use std::io;
use std::sync::Arc;

use actix_middleware::{JwtAuthMiddleware, RequireAdmin};
use auth_service::db::postgres::PgAccountStore;
use auth_service::handlers;
use auth_service::openapi::ApiDoc;
use auth_service::services::{AuthService, EmailService};
use auth_service::{AppState, Settings};
use crypto_core::jwt;
use db_pool::DbConfig;

fn to_io_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{context}: {err}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();

    let settings = Settings::load().map_err(|e| to_io_error("Failed to load configuration", e))?;

    jwt::initialize_jwt_keys(&settings.jwt.private_key_pem, &settings.jwt.public_key_pem)
        .map_err(|e| to_io_error("Failed to initialize JWT keys", e))?;

    let db_config = DbConfig::from_env("auth-service")
        .map_err(|e| to_io_error("Failed to load database configuration", e))?
        .with_url(&settings.database.url);
    let pool = db_pool::create_pool(&db_config)
        .await
        .map_err(|e| to_io_error("Failed to connect to database", e))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| to_io_error("Failed to run migrations", e))?;

    let store = Arc::new(PgAccountStore::new(pool));
    let mailer =
        EmailService::new(&settings.email).map_err(|e| to_io_error("Failed to set up mailer", e))?;
    let auth = AuthService::new(store, mailer, settings.auth.allowed_email_domain.clone());
    let state = AppState { auth };

    let bind_address = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!(address = %bind_address, "Auth service starting");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(web_middleware::Logger::default())
            .route("/health", web::get().to(handlers::health))
            .route(
                ApiDoc::openapi_json_path(),
                web::get().to(|| async {
                    use utoipa::OpenApi;
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .json(ApiDoc::openapi())
                }),
            )
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(handlers::auth::signup))
                    .route("/send-otp", web::post().to(handlers::auth::send_otp))
                    .route("/verify-otp", web::post().to(handlers::auth::verify_otp))
                    .route("/signin", web::post().to(handlers::auth::signin))
                    .route(
                        "/refresh-token",
                        web::post().to(handlers::auth::refresh_token),
                    )
                    .route(
                        "/forgot-password",
                        web::post().to(handlers::auth::forgot_password),
                    )
                    .route(
                        "/reset-password",
                        web::post().to(handlers::auth::reset_password),
                    )
                    .service(
                        web::resource("/signout")
                            .wrap(JwtAuthMiddleware)
                            .route(web::post().to(handlers::auth::signout)),
                    )
                    .service(
                        web::resource("/current-user")
                            .wrap(JwtAuthMiddleware)
                            .route(web::get().to(handlers::auth::current_user)),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(RequireAdmin)
                    .wrap(JwtAuthMiddleware)
                    .route("/analytics", web::get().to(handlers::admin::analytics)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
