//! System settings endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::settings::SystemConfig};

/// Get branding and contact settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Current settings", body = SystemConfig)
    )
)]
pub async fn get_settings(State(state): State<crate::AppState>) -> Json<SystemConfig> {
    Json(state.services.settings.get_settings().await)
}

/// Replace the settings
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    request_body = SystemConfig,
    responses(
        (status = 200, description = "Settings updated", body = SystemConfig),
        (status = 400, description = "Invalid settings"),
        (status = 403, description = "Not allowed for the active role")
    )
)]
pub async fn update_settings(
    State(state): State<crate::AppState>,
    Json(request): Json<SystemConfig>,
) -> AppResult<Json<SystemConfig>> {
    let updated = state.services.settings.update_settings(request).await?;
    Ok(Json(updated))
}
