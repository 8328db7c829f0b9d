use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::popular_books_handler))
        .route("/health", get(handlers::health_check))
        .route("/book_detail/{title}", get(handlers::book_detail_handler))
        .route("/register", post(handlers::register_handler))
        .route("/login", post(handlers::login_handler))
        .route("/logout", post(handlers::logout_handler))
        .route("/profile", get(handlers::profile_handler))
        .route("/delete_profile", post(handlers::delete_profile_handler))
        .route(
            "/add_to_favorites/{title}",
            post(handlers::add_favorite_handler),
        )
        .route(
            "/remove_from_favorites/{title}",
            post(handlers::remove_favorite_handler),
        )
        .route("/recommend_books", post(handlers::recommend_books_handler))
        .route("/personalized", get(handlers::personalized_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
