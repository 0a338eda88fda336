//! Session endpoints: staff login and borrower session

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        session::Session,
        user::{LoginRequest, UserShort},
    },
};

/// Current role and borrower identity
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses(
        (status = 200, description = "Active session", body = Session)
    )
)]
pub async fn get_session(State(state): State<crate::AppState>) -> Json<Session> {
    Json(state.services.session.current().await)
}

/// Staff login by username or email
#[utoipa::path(
    post,
    path = "/session/login",
    tag = "session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserShort),
        (status = 401, description = "Invalid login or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<UserShort>> {
    let user = state.services.users.login(&request).await?;
    Ok(Json(user))
}

/// Leave the staff role and clear the borrower session
#[utoipa::path(
    post,
    path = "/session/logout",
    tag = "session",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout(State(state): State<crate::AppState>) -> StatusCode {
    state.services.users.logout().await;
    StatusCode::NO_CONTENT
}

/// Forget the borrower identity
#[utoipa::path(
    post,
    path = "/session/end-borrower",
    tag = "session",
    responses(
        (status = 204, description = "Borrower session cleared")
    )
)]
pub async fn end_borrower(State(state): State<crate::AppState>) -> StatusCode {
    state.services.session.end_borrower().await;
    StatusCode::NO_CONTENT
}
