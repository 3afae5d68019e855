//! The [`CustomerStore`] abstraction and its implementations.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use crm_core::customer::{Customer, CustomerImage, CustomerPatch, NewCustomer};
use crm_core::types::{new_customer_id, CustomerId};
use tokio::sync::RwLock;

use crate::repositories::CustomerRepo;
use crate::DbPool;

/// Errors raised by a customer store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedCustomer {
    /// The record as persisted after the update.
    pub customer: Customer,
    /// Image reference the record carried before the update.
    pub previous_image: Option<CustomerImage>,
}

impl UpdatedCustomer {
    /// The previous image, if the update replaced it with a different one.
    pub fn replaced_image(&self) -> Option<&CustomerImage> {
        self.previous_image
            .as_ref()
            .filter(|prev| self.customer.image.as_ref() != Some(*prev))
    }
}

/// Persistence for customer records.
///
/// Each operation is atomic for a single record. There are no cross-record
/// transactions and no optimistic-concurrency checks, so concurrent updates
/// of one record are last-write-wins.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All records in store-default order.
    async fn list(&self) -> Result<Vec<Customer>, StoreError>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Persist a new record with a freshly generated id and timestamps.
    async fn create(&self, input: &NewCustomer) -> Result<Customer, StoreError>;

    /// Apply a patch. Returns `None` (and changes nothing) if `id` is unknown.
    async fn update(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Option<UpdatedCustomer>, StoreError>;

    /// Remove a record permanently, returning it. `None` if `id` is unknown.
    async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Whether the store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: DbPool,
}

impl PgCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = CustomerRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = CustomerRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(Customer::from))
    }

    async fn create(&self, input: &NewCustomer) -> Result<Customer, StoreError> {
        let row = CustomerRepo::create(&self.pool, new_customer_id(), input).await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Option<UpdatedCustomer>, StoreError> {
        let updated = CustomerRepo::update(&self.pool, id, patch).await?;
        Ok(updated.map(|(row, previous_image)| UpdatedCustomer {
            customer: row.into(),
            previous_image,
        }))
    }

    async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = CustomerRepo::delete(&self.pool, id).await?;
        Ok(row.map(Customer::from))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// In-memory store for development and tests.
///
/// Records are kept in insertion order. [`MemoryCustomerStore::set_available`]
/// simulates an unreachable backend.
#[derive(Default)]
pub struct MemoryCustomerStore {
    records: RwLock<Vec<Customer>>,
    unavailable: AtomicBool,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated outages. While unavailable every operation fails.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        self.ensure_available()?;
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        self.ensure_available()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, input: &NewCustomer) -> Result<Customer, StoreError> {
        self.ensure_available()?;
        let customer = Customer::create(new_customer_id(), input.clone(), Utc::now());
        self.records.write().await.push(customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Option<UpdatedCustomer>, StoreError> {
        self.ensure_available()?;
        let mut records = self.records.write().await;
        let Some(customer) = records.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        let previous_image = customer.image.clone();
        customer.apply_patch(patch.clone(), Utc::now());

        Ok(Some(UpdatedCustomer {
            customer: customer.clone(),
            previous_image,
        }))
    }

    async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        self.ensure_available()?;
        let mut records = self.records.write().await;
        let Some(index) = records.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        Ok(Some(records.remove(index)))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_available()
    }
}
