use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use vend_pricing::VariantQuote;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub variant_id: Uuid,
    pub currency: String,
    pub amount: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/variants/{id}/price", get(get_variant_price))
        .route("/v1/products/{id}/quote", get(get_product_quote))
        .route("/v1/products/{id}/snapshot", get(get_product_snapshot))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/variants/{id}/price?currency=EUR
pub async fn get_variant_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceResponse>, AppError> {
    let amount = state.pricing.price(id, &query.currency).await?;

    Ok(Json(PriceResponse {
        variant_id: id,
        currency: query.currency.trim().to_uppercase(),
        amount,
    }))
}

/// GET /v1/products/{id}/quote?currency=EUR
/// Default-variant price and availability
pub async fn get_product_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<VariantQuote>, AppError> {
    let quote = state.pricing.quote(id, &query.currency).await?;
    Ok(Json(quote))
}

/// GET /v1/products/{id}/snapshot
/// Point-in-time copy of the product's attributes
pub async fn get_product_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.pricing.snapshot(id).await?;
    Ok(Json(snapshot))
}
