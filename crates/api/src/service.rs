//! Customer operations coordinating the record store and image storage.
//!
//! Image writes are not transactional with record writes, so every
//! operation follows the same two-phase shape: the image is stored first,
//! the record second, and a failed record write deletes the freshly stored
//! image again. Images that a record stops referencing (replaced on update,
//! or orphaned by delete) are removed after the record write succeeds.
//! Cleanup is best effort: a failure is logged and never fails the request.

use std::sync::Arc;

use crm_core::customer::{Customer, CustomerImage};
use crm_core::error::CoreError;
use crm_core::types::CustomerId;
use crm_core::upload::ImageUpload;
use crm_db::store::CustomerStore;
use crm_storage::ImageStorage;

use crate::error::AppResult;
use crate::multipart::{CustomerForm, ImagePart};

/// Customer use cases, shared by all handlers through `AppState`.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    images: Arc<dyn ImageStorage>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>, images: Arc<dyn ImageStorage>) -> Self {
        Self { store, images }
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, raw_id: &str) -> AppResult<Customer> {
        let id = parse_id(raw_id)?;
        let customer = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::customer_not_found(id))?;
        Ok(customer)
    }

    /// Validate, store the optional image, then persist the record.
    ///
    /// Validation happens before any write, so a rejected request leaves no
    /// stored image behind.
    pub async fn create(&self, form: CustomerForm) -> AppResult<Customer> {
        let mut input = form.fields.into_new_customer()?;
        let upload = form.image.map(ImagePart::into_upload).transpose()?;

        let stored = self.store_image(upload.as_ref()).await?;
        input.image = stored.clone();

        match self.store.create(&input).await {
            Ok(customer) => Ok(customer),
            Err(err) => {
                self.discard_image(stored.as_ref(), "create failed").await;
                Err(err.into())
            }
        }
    }

    /// Apply a partial update, replacing the image when a new one is given.
    ///
    /// An unknown id is reported as not found before the body is validated.
    pub async fn update(&self, raw_id: &str, form: CustomerForm) -> AppResult<Customer> {
        let id = parse_id(raw_id)?;
        if self.store.find_by_id(id).await?.is_none() {
            return Err(CoreError::customer_not_found(id).into());
        }

        let mut patch = form.fields.into_patch()?;
        let upload = form.image.map(ImagePart::into_upload).transpose()?;

        let stored = self.store_image(upload.as_ref()).await?;
        patch.image = stored.clone();

        let updated = match self.store.update(id, &patch).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.discard_image(stored.as_ref(), "customer not found").await;
                return Err(CoreError::customer_not_found(id).into());
            }
            Err(err) => {
                self.discard_image(stored.as_ref(), "update failed").await;
                return Err(err.into());
            }
        };

        self.discard_image(updated.replaced_image(), "image replaced")
            .await;

        Ok(updated.customer)
    }

    /// Delete a record and cascade-delete its image.
    pub async fn delete(&self, raw_id: &str) -> AppResult<CustomerId> {
        let id = parse_id(raw_id)?;
        let deleted = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| CoreError::customer_not_found(id))?;

        self.discard_image(deleted.image.as_ref(), "customer deleted")
            .await;

        Ok(deleted.id)
    }

    /// Whether the record store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.store.health_check().await.is_ok()
    }

    async fn store_image(&self, upload: Option<&ImageUpload>) -> AppResult<Option<CustomerImage>> {
        match upload {
            Some(upload) => Ok(Some(self.images.store(upload).await?)),
            None => Ok(None),
        }
    }

    async fn discard_image(&self, image: Option<&CustomerImage>, reason: &'static str) {
        let Some(image) = image else {
            return;
        };
        if let Err(err) = self.images.delete(&image.storage_id).await {
            tracing::warn!(
                storage_id = %image.storage_id,
                reason,
                error = %err,
                "Failed to delete image; object left orphaned"
            );
        }
    }
}

/// Ids are opaque to clients. A value that cannot be an id cannot match a
/// record either, so it is reported as not found.
fn parse_id(raw: &str) -> Result<CustomerId, CoreError> {
    CustomerId::parse_str(raw).map_err(|_| CoreError::customer_not_found(raw))
}
