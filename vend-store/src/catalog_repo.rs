use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vend_catalog::{Product, ProductRepository, Variant, VariantRepository};

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    type_id: Uuid,
    tax_category_id: Uuid,
    shipping_category_id: Uuid,
    post_date: Option<chrono::DateTime<chrono::Utc>>,
    expiry_date: Option<chrono::DateTime<chrono::Utc>>,
    promotable: bool,
    free_shipping: bool,
    enabled: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            type_id: row.type_id,
            tax_category_id: row.tax_category_id,
            shipping_category_id: row.shipping_category_id,
            post_date: row.post_date,
            expiry_date: row.expiry_date,
            promotable: row.promotable,
            free_shipping: row.free_shipping,
            enabled: row.enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: Uuid,
    product_id: Uuid,
    sku: String,
    price: f64,
    stock: i32,
    unlimited_stock: bool,
    is_default: bool,
    weight: f64,
    length: f64,
    width: f64,
    height: f64,
}

impl From<VariantRow> for Variant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            sku: row.sku,
            price: row.price,
            stock: row.stock,
            unlimited_stock: row.unlimited_stock,
            is_default: row.is_default,
            weight: row.weight,
            length: row.length,
            width: row.width,
            height: row.height,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, title, type_id, tax_category_id, shipping_category_id, \
     post_date, expiry_date, promotable, free_shipping, enabled, created_at, updated_at";

const VARIANT_COLUMNS: &str = "id, product_id, sku, price, stock, unlimited_stock, is_default, \
     weight, length, width, height";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list(&self) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY title",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn save(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, type_id, tax_category_id, shipping_category_id,
                                  post_date, expiry_date, promotable, free_shipping, enabled,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                type_id = EXCLUDED.type_id,
                tax_category_id = EXCLUDED.tax_category_id,
                shipping_category_id = EXCLUDED.shipping_category_id,
                post_date = EXCLUDED.post_date,
                expiry_date = EXCLUDED.expiry_date,
                promotable = EXCLUDED.promotable,
                free_shipping = EXCLUDED.free_shipping,
                enabled = EXCLUDED.enabled,
                updated_at = NOW()
            "#,
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(product.type_id)
        .bind(product.tax_category_id)
        .bind(product.shipping_category_id)
        .bind(product.post_date)
        .bind(product.expiry_date)
        .bind(product.promotable)
        .bind(product.free_shipping)
        .bind(product.enabled)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

pub struct PgVariantRepository {
    pool: PgPool,
}

impl PgVariantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VariantRepository for PgVariantRepository {
    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<Variant>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {} FROM variants WHERE id = $1",
            VARIANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Variant::from))
    }

    async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<Variant>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {} FROM variants WHERE product_id = $1 ORDER BY sort_order ASC",
            VARIANT_COLUMNS
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Variant::from).collect())
    }

    async fn replace_for_product(
        &self,
        product_id: Uuid,
        variants: &[Variant],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // The whole sequence is rewritten in one transaction so readers
        // never observe a partially replaced display order.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM variants WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for (sort_order, variant) in variants.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO variants (id, product_id, sku, price, stock, unlimited_stock,
                                      is_default, weight, length, width, height, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(variant.id)
            .bind(product_id)
            .bind(&variant.sku)
            .bind(variant.price)
            .bind(variant.stock)
            .bind(variant.unlimited_stock)
            .bind(variant.is_default)
            .bind(variant.weight)
            .bind(variant.length)
            .bind(variant.width)
            .bind(variant.height)
            .bind(sort_order as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
