//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, items, loans, session, settings, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SIMPANSE API",
        version = "1.0.0",
        description = "Asset loan request and approval REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Session
        session::get_session,
        session::login,
        session::logout,
        session::end_borrower,
        // Items
        items::list_items,
        items::list_categories,
        items::stock_summary,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        // Loans
        loans::submit_loan,
        loans::lookup_borrower,
        loans::my_loans,
        loans::my_drafts,
        loans::list_loans,
        loans::review_queue,
        loans::export_loans,
        loans::get_loan,
        loans::verify_loan,
        loans::reject_loan,
        loans::approve_loan,
        loans::request_review,
        loans::return_loan,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Settings
        settings::get_settings,
        settings::update_settings,
    ),
    components(
        schemas(
            // Shared enums
            crate::models::enums::LoanStatus,
            crate::models::enums::LoanAction,
            crate::models::enums::SubmissionMode,
            crate::models::enums::ItemStatus,
            crate::models::enums::BorrowerType,
            crate::models::enums::StaffRole,
            crate::models::enums::Role,
            crate::models::enums::TransitionType,
            // Session
            crate::models::session::Session,
            crate::models::session::BorrowerSession,
            crate::models::user::LoginRequest,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemDetails,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::item::StockSummary,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::Institution,
            crate::models::loan::LoanSubmission,
            crate::models::loan::SubmitLoanRequest,
            crate::models::loan::SubmissionReceipt,
            crate::models::loan::LookupRequest,
            crate::models::loan::LookupResponse,
            crate::models::loan::BorrowerProfile,
            crate::models::loan::RejectLoanRequest,
            // Users
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::CreatedUser,
            // Settings
            crate::models::settings::SystemConfig,
            crate::models::settings::SliderItem,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Staff login and borrower session"),
        (name = "items", description = "Catalog item management"),
        (name = "loans", description = "Loan requests and approval pipeline"),
        (name = "users", description = "Staff account management"),
        (name = "settings", description = "System settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
