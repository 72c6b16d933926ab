use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use vend_catalog::{CatalogError, Product, ProductStatus, Variant};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveProductRequest {
    pub id: Option<Uuid>,
    pub title: String,
    pub type_id: Uuid,
    pub tax_category_id: Uuid,
    pub shipping_category_id: Uuid,
    pub post_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub promotable: bool,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub variants: Vec<SaveVariantRequest>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SaveVariantRequest {
    pub id: Option<Uuid>,
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub unlimited_stock: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub type_id: Uuid,
    pub tax_category_id: Uuid,
    pub shipping_category_id: Uuid,
    pub post_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub promotable: bool,
    pub free_shipping: bool,
    pub enabled: bool,
    pub status: ProductStatus,
}

impl ProductResponse {
    fn from_product(product: Product, now: DateTime<Utc>) -> Self {
        let status = product.status_at(now);
        Self {
            id: product.id,
            title: product.title,
            type_id: product.type_id,
            tax_category_id: product.tax_category_id,
            shipping_category_id: product.shipping_category_id,
            post_date: product.post_date,
            expiry_date: product.expiry_date,
            promotable: product.promotable,
            free_shipping: product.free_shipping,
            enabled: product.enabled,
            status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub price: f64,
    pub stock: i32,
    pub unlimited_stock: bool,
    pub is_default: bool,
}

impl From<Variant> for VariantResponse {
    fn from(variant: Variant) -> Self {
        Self {
            id: variant.id,
            product_id: variant.product_id,
            sku: variant.sku,
            price: variant.price,
            stock: variant.stock,
            unlimited_stock: variant.unlimited_stock,
            is_default: variant.is_default,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub product_id: Uuid,
    pub total_stock: i32,
    pub unlimited_stock: bool,
    pub status: ProductStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products).post(save_product))
        .route("/v1/products/{id}", get(get_product).delete(delete_product))
        .route("/v1/products/{id}/variants", get(get_variants))
        .route("/v1/products/{id}/stock", get(get_stock))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let now = Utc::now();
    let products = state.catalog.list_products().await?;

    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductResponse::from_product(p, now))
            .collect(),
    ))
}

/// GET /v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state.catalog.product(id).await?;
    Ok(Json(ProductResponse::from_product(product, Utc::now())))
}

/// POST /v1/products
/// Create or update a product and its variant sequence; the caller is
/// assumed pre-authorized
pub async fn save_product(
    State(state): State<AppState>,
    Json(req): Json<SaveProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let now = Utc::now();
    let product_id = req.id.unwrap_or_else(Uuid::new_v4);

    // Keep the original creation time on updates.
    let created_at = match state.catalog.product(product_id).await {
        Ok(existing) => existing.created_at,
        Err(CatalogError::ProductNotFound(_)) => now,
        Err(err) => return Err(err.into()),
    };

    let product = Product {
        id: product_id,
        title: req.title,
        type_id: req.type_id,
        tax_category_id: req.tax_category_id,
        shipping_category_id: req.shipping_category_id,
        post_date: req.post_date,
        expiry_date: req.expiry_date,
        promotable: req.promotable,
        free_shipping: req.free_shipping,
        enabled: req.enabled,
        created_at,
        updated_at: now,
    };

    let variants: Vec<Variant> = req
        .variants
        .into_iter()
        .map(|v| Variant {
            id: v.id.unwrap_or_else(Uuid::new_v4),
            product_id,
            sku: v.sku,
            price: v.price,
            stock: v.stock,
            unlimited_stock: v.unlimited_stock,
            is_default: v.is_default,
            weight: v.weight,
            length: v.length,
            width: v.width,
            height: v.height,
        })
        .collect();

    state.catalog.save_product(&product, &variants).await?;
    Ok(Json(ProductResponse::from_product(product, now)))
}

/// DELETE /v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/products/{id}/variants
pub async fn get_variants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VariantResponse>>, AppError> {
    let variants = state.catalog.variants(id).await?;
    Ok(Json(
        variants.into_iter().map(VariantResponse::from).collect(),
    ))
}

/// GET /v1/products/{id}/stock
pub async fn get_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockResponse>, AppError> {
    let product = state.catalog.product(id).await?;
    let total_stock = state.catalog.total_stock(id).await?;
    let unlimited_stock = state.catalog.has_unlimited_stock(id).await?;

    Ok(Json(StockResponse {
        product_id: id,
        total_stock,
        unlimited_stock,
        status: product.status_at(Utc::now()),
    }))
}
