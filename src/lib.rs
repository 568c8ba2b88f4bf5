pub mod config;
pub mod db;
pub mod error;
pub mod prices;
pub mod validation;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use error::ErrorResponse;
use prices::{MessageResponse, PriceRequest, PriceResponse, PriceService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        prices::handlers::list_prices,
        prices::handlers::get_price,
        prices::handlers::create_price,
        prices::handlers::update_price,
        prices::handlers::delete_price,
    ),
    components(
        schemas(PriceRequest, PriceResponse, MessageResponse, ErrorResponse)
    ),
    tags(
        (name = "prices", description = "Schedule price management endpoints")
    ),
    info(
        title = "Price API",
        version = "1.0.0",
        description = "RESTful API for managing schedule prices"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub price_service: PriceService,
}

impl AppState {
    pub fn new(price_service: PriceService) -> Self {
        Self { price_service }
    }
}

/// Creates and configures the application router
///
/// `prices_path` is where the price resource is mounted, e.g. "/api/prices".
pub fn create_router(state: AppState, prices_path: &str) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(prices_path, prices::routes())
        .fallback(error::route_not_found)
        .layer(cors)
        .with_state(state)
}
