use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use vend_catalog::CatalogError;
use vend_currency::CurrencyError;
use vend_pricing::PricingError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::Validation(_) | CurrencyError::UnknownCurrency(_) => {
                AppError::BadRequest(err.to_string())
            }
            CurrencyError::MissingPrimary | CurrencyError::Storage(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(_) | CatalogError::VariantNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CatalogError::Validation(_) => AppError::BadRequest(err.to_string()),
            CatalogError::Storage(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::Catalog(inner) => inner.into(),
            PricingError::Currency(inner) => inner.into(),
        }
    }
}
