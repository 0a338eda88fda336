//! API handlers for SIMPANSE REST endpoints

pub mod health;
pub mod items;
pub mod loans;
pub mod openapi;
pub mod session;
pub mod settings;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Session
        .route("/session", get(session::get_session))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/session/end-borrower", post(session::end_borrower))
        // Items (catalog)
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/categories", get(items::list_categories))
        .route("/items/summary", get(items::stock_summary))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::submit_loan))
        .route("/loans/lookup", post(loans::lookup_borrower))
        .route("/loans/mine", get(loans::my_loans))
        .route("/loans/drafts", get(loans::my_drafts))
        .route("/loans/review-queue", get(loans::review_queue))
        .route("/loans/export", get(loans::export_loans))
        .route("/loans/:id", get(loans::get_loan))
        .route("/loans/:id/verify", post(loans::verify_loan))
        .route("/loans/:id/reject", post(loans::reject_loan))
        .route("/loans/:id/approve", post(loans::approve_loan))
        .route("/loans/:id/review", post(loans::request_review))
        .route("/loans/:id/return", post(loans::return_loan))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Settings
        .route("/settings", get(settings::get_settings).put(settings::update_settings))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
