// HTTP handlers for price endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::prices::{MessageResponse, PriceError, PriceRequest, PriceResponse, PriceUpdate};
use crate::AppState;

/// A path id that is not a UUID cannot name a stored price
fn parse_id(raw: &str) -> Result<Uuid, PriceError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!("Path id {:?} is not a price id", raw);
        PriceError::NotFound
    })
}

/// Handler for GET /api/prices
#[utoipa::path(
    get,
    path = "/api/prices",
    responses(
        (status = 200, description = "List of all prices", body = Vec<PriceResponse>),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn list_prices(
    State(state): State<AppState>,
) -> Result<Json<Vec<PriceResponse>>, PriceError> {
    tracing::debug!("Fetching all prices");

    let prices = state.price_service.get_all().await?;

    Ok(Json(prices.into_iter().map(PriceResponse::from).collect()))
}

/// Handler for GET /api/prices/:id
#[utoipa::path(
    get,
    path = "/api/prices/{id}",
    params(
        ("id" = String, Path, description = "Price id (UUID)")
    ),
    responses(
        (status = 200, description = "Price found", body = PriceResponse),
        (status = 404, description = "Price not found", body = crate::error::ErrorResponse,
            example = json!({"code": "PRICE_NOT_FOUND", "msg": "Price not found"})),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn get_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PriceResponse>, PriceError> {
    tracing::debug!("Fetching price with id: {}", id);
    let id = parse_id(&id)?;

    let price = state
        .price_service
        .get_by_id(id)
        .await?
        .ok_or(PriceError::NotFound)?;

    Ok(Json(price.into()))
}

/// Handler for POST /api/prices
#[utoipa::path(
    post,
    path = "/api/prices",
    request_body = PriceRequest,
    responses(
        (status = 201, description = "Price created", body = PriceResponse),
        (status = 400, description = "Price not created or invalid body", body = crate::error::ErrorResponse,
            example = json!({"code": "PRICE_NOT_CREATED", "msg": "Price not created"})),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn create_price(
    State(state): State<AppState>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PriceResponse>), PriceError> {
    let Json(request) = payload?;
    request.validate()?;
    tracing::debug!("Creating price for schedule: {}", request.schedule_id);

    let price = state
        .price_service
        .create_price(request.into())
        .await?
        .ok_or(PriceError::NotCreated)?;

    Ok((StatusCode::CREATED, Json(price.into())))
}

/// Handler for PUT /api/prices/:id
#[utoipa::path(
    put,
    path = "/api/prices/{id}",
    params(
        ("id" = String, Path, description = "Price id (UUID)")
    ),
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Price updated", body = PriceResponse),
        (status = 400, description = "Invalid body", body = crate::error::ErrorResponse),
        (status = 404, description = "Price not found", body = crate::error::ErrorResponse,
            example = json!({"code": "PRICE_NOT_FOUND", "msg": "Price not found"})),
        (status = 409, description = "Schedule and currency already priced", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceResponse>, PriceError> {
    tracing::debug!("Updating price with id: {}", id);
    let Json(request) = payload?;
    request.validate()?;
    let id = parse_id(&id)?;

    let price = state
        .price_service
        .update_by_id(PriceUpdate {
            id,
            fields: request.into(),
        })
        .await?
        .ok_or(PriceError::NotFound)?;

    Ok(Json(price.into()))
}

/// Handler for DELETE /api/prices/:id
///
/// The acknowledgement body rides on a 204; HTTP/1.1 servers drop it on the wire.
#[utoipa::path(
    delete,
    path = "/api/prices/{id}",
    params(
        ("id" = String, Path, description = "Price id (UUID)")
    ),
    responses(
        (status = 204, description = "Price deleted", body = MessageResponse),
        (status = 404, description = "Price not found", body = crate::error::ErrorResponse,
            example = json!({"code": "PRICE_NOT_FOUND", "msg": "Price not found"})),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn delete_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), PriceError> {
    tracing::debug!("Deleting price with id: {}", id);
    let id = parse_id(&id)?;

    state
        .price_service
        .delete_by_id(id)
        .await?
        .ok_or(PriceError::NotFound)?;

    Ok((StatusCode::NO_CONTENT, Json(MessageResponse::deleted())))
}
