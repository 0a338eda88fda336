//! Item (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::item::{CreateItem, ItemDetails, ItemQuery, StockSummary, UpdateItem},
};

/// List items, optionally filtered
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("search" = Option<String>, Query, description = "Search in name or category"),
        ("category" = Option<String>, Query, description = "Exact category")
    ),
    responses(
        (status = 200, description = "List of items", body = Vec<ItemDetails>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    Query(query): Query<ItemQuery>,
) -> Json<Vec<ItemDetails>> {
    Json(state.services.catalog.search_items(&query).await)
}

/// Distinct categories in catalog order
#[utoipa::path(
    get,
    path = "/items/categories",
    tag = "items",
    responses(
        (status = 200, description = "Categories", body = Vec<String>)
    )
)]
pub async fn list_categories(State(state): State<crate::AppState>) -> Json<Vec<String>> {
    Json(state.services.catalog.categories().await)
}

/// Stock totals
#[utoipa::path(
    get,
    path = "/items/summary",
    tag = "items",
    responses(
        (status = 200, description = "Stock summary", body = StockSummary)
    )
)]
pub async fn stock_summary(State(state): State<crate::AppState>) -> Json<StockSummary> {
    Json(state.services.catalog.summary().await)
}

/// Get item details by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.catalog.get_item(&id).await?;
    Ok(Json(item))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemDetails),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not allowed for the active role"),
        (status = 409, description = "Item already exists")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    Json(item): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemDetails>)> {
    let created = state.services.catalog.create_item(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemDetails),
        (status = 400, description = "Invalid quantities"),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(item): Json<UpdateItem>,
) -> AppResult<Json<ItemDetails>> {
    let updated = state.services.catalog.update_item(&id, item).await?;
    Ok(Json(updated))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Not allowed for the active role"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_item(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
