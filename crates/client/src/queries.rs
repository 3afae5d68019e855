//! Cached customer queries and cache-invalidating mutations.

use std::sync::Arc;

use crm_core::customer::Customer;
use crm_core::types::CustomerId;
use validator::Validate;

use crate::api::{CustomerApi, DeleteTarget};
use crate::cache::{QueryCache, QueryKey};
use crate::error::ClientResult;
use crate::form::CustomerForm;

/// Reads go through the cache; successful writes invalidate it.
///
/// Failed writes leave the cache as it was. Cached data is never patched in
/// place; the next read refetches the list.
#[derive(Clone)]
pub struct CustomerQueries {
    api: CustomerApi,
    cache: QueryCache,
}

impl CustomerQueries {
    pub fn new(api: CustomerApi, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The customer list, served from cache when present.
    pub async fn customers(&self) -> ClientResult<Arc<Vec<Customer>>> {
        if let Some(list) = self.cache.get(QueryKey::Customers).await {
            return Ok(list);
        }

        let list = Arc::new(self.api.list().await?);
        self.cache.set(QueryKey::Customers, list.clone()).await;
        Ok(list)
    }

    /// Look a customer up in the cached list. Never requests a single record.
    pub async fn customer_by_id(&self, id: CustomerId) -> ClientResult<Option<Customer>> {
        let list = self.customers().await?;
        Ok(list.iter().find(|c| c.id == id).cloned())
    }

    pub async fn create(&self, form: &CustomerForm) -> ClientResult<Customer> {
        form.validate()?;
        let customer = self.api.create(form).await?;
        self.cache.invalidate(QueryKey::Customers).await;
        Ok(customer)
    }

    pub async fn update(&self, id: CustomerId, form: &CustomerForm) -> ClientResult<Customer> {
        form.validate()?;
        let customer = self.api.update(id, form).await?;
        self.cache.invalidate(QueryKey::Customers).await;
        Ok(customer)
    }

    pub async fn delete(&self, target: impl Into<DeleteTarget>) -> ClientResult<Vec<CustomerId>> {
        let ids = self.api.delete(target).await?;
        self.cache.invalidate(QueryKey::Customers).await;
        Ok(ids)
    }

    /// Create each form in order, stopping at the first failure.
    ///
    /// Records created before the failure stay created.
    pub async fn insert_seed(&self, forms: &[CustomerForm]) -> ClientResult<Vec<Customer>> {
        let mut created = Vec::with_capacity(forms.len());
        for form in forms {
            created.push(self.create(form).await?);
        }
        tracing::info!(count = created.len(), "Seed customers inserted");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientError;

    /// Points at a closed port; any request that goes out fails.
    fn offline_queries() -> CustomerQueries {
        let api = CustomerApi::new(&ClientConfig::new("http://127.0.0.1:9/api/v1/customers"));
        CustomerQueries::new(api, QueryCache::new())
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_before_sending() {
        let queries = offline_queries();
        let err = queries
            .create(&CustomerForm::new("A", "ana@x.com"))
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Validation(_));
    }

    #[tokio::test]
    async fn cached_list_is_served_without_request() {
        let queries = offline_queries();
        queries
            .cache()
            .set(QueryKey::Customers, Arc::new(Vec::new()))
            .await;

        let list = queries.customers().await.unwrap();
        assert!(list.is_empty());
        let found = queries
            .customer_by_id(crm_core::types::new_customer_id())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn failed_mutation_keeps_cache() {
        let queries = offline_queries();
        queries
            .cache()
            .set(QueryKey::Customers, Arc::new(Vec::new()))
            .await;

        let err = queries
            .delete(crm_core::types::new_customer_id())
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Request(_));
        assert!(queries.cache().get(QueryKey::Customers).await.is_some());
    }
}
