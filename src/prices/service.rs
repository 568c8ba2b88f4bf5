use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::prices::{Price, PriceError, PriceFields, PriceRepository, PriceUpdate};

/// Service layer for price records
///
/// Every operation answers "absent" with `Ok(None)` and leaves the HTTP
/// mapping to the handlers.
#[derive(Clone)]
pub struct PriceService {
    repository: Arc<dyn PriceRepository>,
}

impl PriceService {
    pub fn new(repository: Arc<dyn PriceRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> Result<Vec<Price>, PriceError> {
        let prices = self.repository.find_all().await?;
        tracing::debug!("Retrieved {} prices", prices.len());
        Ok(prices)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Price>, PriceError> {
        self.repository.find_by_id(id).await
    }

    /// Create a price
    ///
    /// Absent timestamps default to now. Returns `None` when the store
    /// refuses the record (a price for this schedule and currency exists).
    pub async fn create_price(&self, fields: PriceFields) -> Result<Option<Price>, PriceError> {
        let now = Utc::now();
        let price = Price {
            id: Uuid::new_v4(),
            schedule_id: fields.schedule_id,
            price_value: fields.price_value,
            price_currency: fields.price_currency,
            created_at: fields.created_at.unwrap_or(now),
            updated_at: fields.updated_at.unwrap_or(now),
        };

        let created = self.repository.insert(price).await?;
        match &created {
            Some(price) => tracing::info!("Created price {}", price.id),
            None => tracing::debug!("Store refused new price"),
        }
        Ok(created)
    }

    /// Replace the fields of an existing price
    ///
    /// An absent `updated_at` becomes now; an absent `created_at` is left as stored.
    pub async fn update_by_id(&self, mut update: PriceUpdate) -> Result<Option<Price>, PriceError> {
        update.fields.updated_at.get_or_insert_with(Utc::now);

        let id = update.id;
        let updated = self.repository.update(update).await?;
        if updated.is_some() {
            tracing::info!("Updated price {}", id);
        }
        Ok(updated)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<Option<Price>, PriceError> {
        let deleted = self.repository.delete(id).await?;
        if deleted.is_some() {
            tracing::info!("Deleted price {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::InMemoryPriceRepository;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn service() -> PriceService {
        PriceService::new(Arc::new(InMemoryPriceRepository::new()))
    }

    fn fields(schedule_id: &str) -> PriceFields {
        PriceFields {
            schedule_id: schedule_id.to_string(),
            price_value: dec!(10),
            price_currency: "USD".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_timestamps() {
        let before = Utc::now();
        let price = service()
            .create_price(fields("s1"))
            .await
            .unwrap()
            .expect("Price should be created");

        assert!(price.created_at >= before);
        assert_eq!(price.created_at, price.updated_at);
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_timestamps() {
        let at = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let mut input = fields("s1");
        input.created_at = Some(at);
        input.updated_at = Some(at);

        let price = service().create_price(input).await.unwrap().unwrap();
        assert_eq!(price.created_at, at);
        assert_eq!(price.updated_at, at);
    }

    #[tokio::test]
    async fn test_create_duplicate_returns_none() {
        let service = service();
        assert!(service.create_price(fields("s1")).await.unwrap().is_some());
        assert!(service.create_price(fields("s1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_sets_updated_at_when_absent() {
        let service = service();
        let at = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let mut input = fields("s1");
        input.created_at = Some(at);
        input.updated_at = Some(at);
        let created = service.create_price(input).await.unwrap().unwrap();

        let updated = service
            .update_by_id(PriceUpdate { id: created.id, fields: fields("s2") })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.schedule_id, "s2");
        assert_eq!(updated.created_at, at);
        assert!(updated.updated_at > at);
    }

    #[tokio::test]
    async fn test_get_and_delete_round() {
        let service = service();
        let created = service.create_price(fields("s1")).await.unwrap().unwrap();

        assert_eq!(service.get_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(service.get_all().await.unwrap().len(), 1);
        assert_eq!(service.delete_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(service.delete_by_id(created.id).await.unwrap(), None);
        assert!(service.get_all().await.unwrap().is_empty());
    }
}
