use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vend_currency::{CurrencyRepository, PaymentCurrency};

pub struct PgCurrencyRepository {
    pool: PgPool,
}

impl PgCurrencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct CurrencyRow {
    id: Uuid,
    iso: String,
    rate: f64,
    is_primary: bool,
}

impl From<CurrencyRow> for PaymentCurrency {
    fn from(row: CurrencyRow) -> Self {
        Self {
            id: row.id,
            iso: row.iso,
            rate: row.rate,
            is_primary: row.is_primary,
        }
    }
}

#[async_trait]
impl CurrencyRepository for PgCurrencyRepository {
    async fn list(&self) -> Result<Vec<PaymentCurrency>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, CurrencyRow>(
            "SELECT id, iso, rate, is_primary FROM payment_currencies \
             ORDER BY is_primary DESC, iso ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PaymentCurrency::from).collect())
    }

    async fn save(
        &self,
        record: &PaymentCurrency,
    ) -> Result<PaymentCurrency, Box<dyn std::error::Error + Send + Sync>> {
        // Demotion and upsert commit together; a failure in either leaves
        // the previous primary intact.
        let mut tx = self.pool.begin().await?;

        if record.is_primary {
            sqlx::query("UPDATE payment_currencies SET is_primary = FALSE WHERE id <> $1")
                .bind(record.id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO payment_currencies (id, iso, rate, is_primary)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET iso = EXCLUDED.iso, rate = EXCLUDED.rate, is_primary = EXCLUDED.is_primary
            "#,
        )
        .bind(record.id)
        .bind(&record.iso)
        .bind(record.rate)
        .bind(record.is_primary)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM payment_currencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
