//! Route definitions and gate placement.

use actix_web::{web, HttpResponse};

use crate::handlers;
use crate::middleware::AuthMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(handlers::login))
                    .route("/logout", web::post().to(handlers::logout))
                    .service(
                        web::resource("/verify")
                            .wrap(AuthMiddleware)
                            .route(web::get().to(handlers::verify)),
                    ),
            )
            .service(
                web::scope("/pokemon")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(handlers::list_pokemon))
                    .route("/{id}", web::get().to(handlers::get_pokemon)),
            ),
    );
}

/// Liveness probe.
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
