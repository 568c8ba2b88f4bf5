use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::prices::{Price, PriceError, PriceUpdate};

/// Storage for price records
///
/// At most one price may exist per (schedule_id, price_currency) pair.
/// `insert` returns `None` when that pair is taken; `update` reports it as
/// `PriceError::Conflict`.
#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// All prices, oldest first
    async fn find_all(&self) -> Result<Vec<Price>, PriceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Price>, PriceError>;

    async fn insert(&self, price: Price) -> Result<Option<Price>, PriceError>;

    /// `update.fields.updated_at` must already be resolved by the caller
    async fn update(&self, update: PriceUpdate) -> Result<Option<Price>, PriceError>;

    /// Removes the price and returns what was removed
    async fn delete(&self, id: Uuid) -> Result<Option<Price>, PriceError>;
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgPriceRepository {
    pool: PgPool,
}

impl PgPriceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceRepository for PgPriceRepository {
    async fn find_all(&self) -> Result<Vec<Price>, PriceError> {
        let prices = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, schedule_id, price_value, price_currency, created_at, updated_at
            FROM prices
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Price>, PriceError> {
        let price = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, schedule_id, price_value, price_currency, created_at, updated_at
            FROM prices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price)
    }

    async fn insert(&self, price: Price) -> Result<Option<Price>, PriceError> {
        let created = sqlx::query_as::<_, Price>(
            r#"
            INSERT INTO prices (id, schedule_id, price_value, price_currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (schedule_id, price_currency) DO NOTHING
            RETURNING id, schedule_id, price_value, price_currency, created_at, updated_at
            "#,
        )
        .bind(price.id)
        .bind(&price.schedule_id)
        .bind(price.price_value)
        .bind(&price.price_currency)
        .bind(price.created_at)
        .bind(price.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, update: PriceUpdate) -> Result<Option<Price>, PriceError> {
        let fields = update.fields;

        let result = sqlx::query_as::<_, Price>(
            r#"
            UPDATE prices
            SET schedule_id = $1,
                price_value = $2,
                price_currency = $3,
                created_at = COALESCE($4, created_at),
                updated_at = COALESCE($5, NOW())
            WHERE id = $6
            RETURNING id, schedule_id, price_value, price_currency, created_at, updated_at
            "#,
        )
        .bind(&fields.schedule_id)
        .bind(fields.price_value)
        .bind(&fields.price_currency)
        .bind(fields.created_at)
        .bind(fields.updated_at)
        .bind(update.id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(price) => Ok(price),
            Err(err) if PriceError::is_unique_violation(&err) => Err(PriceError::Conflict {
                schedule_id: fields.schedule_id,
                currency: fields.price_currency,
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Price>, PriceError> {
        let deleted = sqlx::query_as::<_, Price>(
            r#"
            DELETE FROM prices
            WHERE id = $1
            RETURNING id, schedule_id, price_value, price_currency, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted)
    }
}

/// Process-local repository, used when no database is configured
#[derive(Default)]
pub struct InMemoryPriceRepository {
    prices: RwLock<HashMap<Uuid, Price>>,
}

impl InMemoryPriceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_slot(a: &Price, schedule_id: &str, currency: &str) -> bool {
    a.schedule_id == schedule_id && a.price_currency == currency
}

#[async_trait]
impl PriceRepository for InMemoryPriceRepository {
    async fn find_all(&self) -> Result<Vec<Price>, PriceError> {
        let prices = self.prices.read().await;
        let mut all: Vec<Price> = prices.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Price>, PriceError> {
        Ok(self.prices.read().await.get(&id).cloned())
    }

    async fn insert(&self, price: Price) -> Result<Option<Price>, PriceError> {
        let mut prices = self.prices.write().await;

        let taken = prices.contains_key(&price.id)
            || prices
                .values()
                .any(|p| same_slot(p, &price.schedule_id, &price.price_currency));
        if taken {
            return Ok(None);
        }

        prices.insert(price.id, price.clone());
        Ok(Some(price))
    }

    async fn update(&self, update: PriceUpdate) -> Result<Option<Price>, PriceError> {
        let mut prices = self.prices.write().await;
        let fields = update.fields;

        let conflict = prices.values().any(|p| {
            p.id != update.id && same_slot(p, &fields.schedule_id, &fields.price_currency)
        });

        let Some(existing) = prices.get_mut(&update.id) else {
            return Ok(None);
        };
        if conflict {
            return Err(PriceError::Conflict {
                schedule_id: fields.schedule_id,
                currency: fields.price_currency,
            });
        }

        existing.schedule_id = fields.schedule_id;
        existing.price_value = fields.price_value;
        existing.price_currency = fields.price_currency;
        if let Some(created_at) = fields.created_at {
            existing.created_at = created_at;
        }
        existing.updated_at = fields.updated_at.unwrap_or_else(Utc::now);

        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Price>, PriceError> {
        Ok(self.prices.write().await.remove(&id))
    }
}
