//! Loan request endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{
        Loan, LoanQuery, LookupRequest, LookupResponse, RejectLoanRequest, SubmissionReceipt,
        SubmitLoanRequest,
    },
};

/// Submit a loan form, or save it as a draft with `mode = later`
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = SubmitLoanRequest,
    responses(
        (status = 201, description = "Loan filed", body = SubmissionReceipt),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item out of stock")
    )
)]
pub async fn submit_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<SubmitLoanRequest>,
) -> AppResult<(StatusCode, Json<SubmissionReceipt>)> {
    let receipt = state.services.loans.submit(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Find a returning borrower by email and the last four NIK digits
#[utoipa::path(
    post,
    path = "/loans/lookup",
    tag = "loans",
    request_body = LookupRequest,
    responses(
        (status = 200, description = "Borrower recognized", body = LookupResponse),
        (status = 400, description = "NIK suffix is not four digits"),
        (status = 404, description = "No previous loan, register as a new borrower")
    )
)]
pub async fn lookup_borrower(
    State(state): State<crate::AppState>,
    Json(request): Json<LookupRequest>,
) -> AppResult<Json<LookupResponse>> {
    let response = state.services.loans.lookup(&request).await?;
    Ok(Json(response))
}

/// Loans of the session borrower, or all loans for staff
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    responses(
        (status = 200, description = "Loans", body = Vec<Loan>)
    )
)]
pub async fn my_loans(State(state): State<crate::AppState>) -> Json<Vec<Loan>> {
    Json(state.services.loans.my_loans().await)
}

/// Drafts saved by the session borrower
#[utoipa::path(
    get,
    path = "/loans/drafts",
    tag = "loans",
    responses(
        (status = 200, description = "Queued loans", body = Vec<Loan>)
    )
)]
pub async fn my_drafts(State(state): State<crate::AppState>) -> Json<Vec<Loan>> {
    Json(state.services.loans.drafts().await)
}

/// Staff listing of all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(
        ("status" = Option<String>, Query, description = "Exact status"),
        ("search" = Option<String>, Query, description = "Search in borrower or item name")
    ),
    responses(
        (status = 200, description = "Loans", body = Vec<Loan>),
        (status = 403, description = "Not allowed for the active role")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list(&query).await?;
    Ok(Json(loans))
}

/// Verified loans and loans under review, for the verificator
#[utoipa::path(
    get,
    path = "/loans/review-queue",
    tag = "loans",
    responses(
        (status = 200, description = "Loans awaiting a decision", body = Vec<Loan>),
        (status = 403, description = "Not allowed for the active role")
    )
)]
pub async fn review_queue(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.review_queue().await?;
    Ok(Json(loans))
}

/// Download the loan log as CSV
#[utoipa::path(
    get,
    path = "/loans/export",
    tag = "loans",
    responses(
        (status = 200, description = "CSV report", content_type = "text/csv", body = String),
        (status = 400, description = "No loans to export"),
        (status = 403, description = "Not allowed for the active role")
    )
)]
pub async fn export_loans(State(state): State<crate::AppState>) -> AppResult<impl IntoResponse> {
    let report = state.services.loans.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename),
            ),
        ],
        report.content,
    ))
}

/// Get a loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan", body = Loan),
        (status = 403, description = "Loan of another borrower"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.get_loan(&id).await?;
    Ok(Json(loan))
}

/// Mark a pending loan as checked by an admin
#[utoipa::path(
    post,
    path = "/loans/{id}/verify",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan verified", body = Loan),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not pending")
    )
)]
pub async fn verify_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.verify(&id).await?;
    Ok(Json(loan))
}

/// Reject a loan with a reason
#[utoipa::path(
    post,
    path = "/loans/{id}/reject",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    request_body = RejectLoanRequest,
    responses(
        (status = 200, description = "Loan rejected", body = Loan),
        (status = 400, description = "Empty reason"),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan cannot be rejected in its current status")
    )
)]
pub async fn reject_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(request): Json<RejectLoanRequest>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.reject(&id, &request.reason).await?;
    Ok(Json(loan))
}

/// Grant permission; the units leave the stock
#[utoipa::path(
    post,
    path = "/loans/{id}/approve",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan approved", body = Loan),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not awaiting a decision")
    )
)]
pub async fn approve_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.approve(&id).await?;
    Ok(Json(loan))
}

/// Ask for further review
#[utoipa::path(
    post,
    path = "/loans/{id}/review",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan flagged for review", body = Loan),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not awaiting a decision")
    )
)]
pub async fn request_review(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.request_review(&id).await?;
    Ok(Json(loan))
}

/// Record the units as returned
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan returned", body = Loan),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not approved")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.mark_returned(&id).await?;
    Ok(Json(loan))
}
