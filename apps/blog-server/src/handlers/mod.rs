//! HTTP handlers and route configuration.

mod covers;
mod form;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::store))
                    .route("/{id}", web::get().to(posts::show))
                    // HTML forms cannot send PUT, so POST to a post updates it too
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::post().to(posts::update))
                    .route("/{id}", web::delete().to(posts::destroy))
                    .route("/{id}/edit", web::get().to(posts::edit)),
            ),
    )
    .route("/storage/cover_images/{name}", web::get().to(covers::show));
}
