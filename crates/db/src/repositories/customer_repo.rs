//! Repository for the `customers` table.

use crm_core::customer::{CustomerImage, CustomerPatch, NewCustomer};
use crm_core::types::CustomerId;
use sqlx::PgPool;

use crate::models::customer::CustomerRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, address, company, notes, \
    image_url, image_storage_id, created_at, updated_at";

/// Provides CRUD operations for customer records.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer with a caller-generated id.
    pub async fn create(
        pool: &PgPool,
        id: CustomerId,
        input: &NewCustomer,
    ) -> Result<CustomerRow, sqlx::Error> {
        let (image_url, image_storage_id) = split_image(input.image.as_ref());
        let query = format!(
            "INSERT INTO customers
                (id, name, email, phone, address, company, notes, image_url, image_storage_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.company)
            .bind(&input.notes)
            .bind(image_url)
            .bind(image_storage_id)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by id.
    pub async fn find_by_id(pool: &PgPool, id: CustomerId) -> Result<Option<CustomerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every customer, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CustomerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY created_at, id");
        sqlx::query_as::<_, CustomerRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch to a customer.
    ///
    /// Returns the updated row together with the image reference it carried
    /// before the update, or `None` if no row with `id` exists. The read and
    /// the write share one transaction so the returned previous image is the
    /// one actually overwritten.
    pub async fn update(
        pool: &PgPool,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Option<(CustomerRow, Option<CustomerImage>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<(Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT image_url, image_storage_id FROM customers WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((prev_url, prev_storage_id)) = previous else {
            tx.rollback().await?;
            return Ok(None);
        };

        let (image_url, image_storage_id) = split_image(patch.image.as_ref());
        let query = format!(
            "UPDATE customers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = CASE WHEN $4 THEN $5 ELSE phone END,
                address = CASE WHEN $6 THEN $7 ELSE address END,
                company = CASE WHEN $8 THEN $9 ELSE company END,
                notes = CASE WHEN $10 THEN $11 ELSE notes END,
                image_url = COALESCE($12, image_url),
                image_storage_id = COALESCE($13, image_storage_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.email)
            .bind(patch.phone.is_some())
            .bind(patch.phone.clone().flatten())
            .bind(patch.address.is_some())
            .bind(patch.address.clone().flatten())
            .bind(patch.company.is_some())
            .bind(patch.company.clone().flatten())
            .bind(patch.notes.is_some())
            .bind(patch.notes.clone().flatten())
            .bind(image_url)
            .bind(image_storage_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let previous_image = match (prev_url, prev_storage_id) {
            (Some(url), Some(storage_id)) => Some(CustomerImage { url, storage_id }),
            _ => None,
        };
        Ok(Some((row, previous_image)))
    }

    /// Permanently delete a customer, returning the removed row.
    pub async fn delete(pool: &PgPool, id: CustomerId) -> Result<Option<CustomerRow>, sqlx::Error> {
        let query = format!("DELETE FROM customers WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

fn split_image(image: Option<&CustomerImage>) -> (Option<&str>, Option<&str>) {
    match image {
        Some(image) => (Some(image.url.as_str()), Some(image.storage_id.as_str())),
        None => (None, None),
    }
}
