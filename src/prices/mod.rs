pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use repository::*;
pub use service::*;

use axum::{routing::get, Router};

use crate::AppState;

/// Price resource routes, relative to their mount point
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_prices).post(create_price))
        .route("/:id", get(get_price).put(update_price).delete(delete_price))
}
