use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use vend_currency::PaymentCurrency;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveCurrencyRequest {
    pub id: Option<Uuid>,
    pub iso: String,
    pub rate: f64,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    pub id: Uuid,
    pub iso: String,
    pub rate: f64,
    pub primary: bool,
}

impl From<PaymentCurrency> for CurrencyResponse {
    fn from(currency: PaymentCurrency) -> Self {
        Self {
            id: currency.id,
            iso: currency.iso,
            rate: currency.rate,
            primary: currency.is_primary,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/currencies", get(list_currencies).post(save_currency))
        .route(
            "/v1/currencies/{iso}",
            get(get_currency).delete(delete_currency),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/currencies
/// All currencies, primary first, then alphabetical
pub async fn list_currencies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CurrencyResponse>>, AppError> {
    let currencies = state.ledger.all().await?;
    Ok(Json(
        currencies.into_iter().map(CurrencyResponse::from).collect(),
    ))
}

/// GET /v1/currencies/{iso}
pub async fn get_currency(
    State(state): State<AppState>,
    Path(iso): Path<String>,
) -> Result<Json<CurrencyResponse>, AppError> {
    let currency = state
        .ledger
        .by_iso(&iso)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown currency: {}", iso.to_uppercase())))?;

    Ok(Json(currency.into()))
}

/// POST /v1/currencies
/// Create or update a currency; the caller is assumed pre-authorized
pub async fn save_currency(
    State(state): State<AppState>,
    Json(req): Json<SaveCurrencyRequest>,
) -> Result<Json<CurrencyResponse>, AppError> {
    let record = PaymentCurrency {
        id: req.id.unwrap_or_else(Uuid::new_v4),
        iso: req.iso,
        rate: req.rate,
        is_primary: req.primary,
    };

    let saved = state.ledger.save(record).await?;
    Ok(Json(saved.into()))
}

/// DELETE /v1/currencies/{id}
/// Idempotent: deleting an absent id still returns 204
pub async fn delete_currency(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ledger.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
