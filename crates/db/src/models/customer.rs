//! Row mapping for the `customers` table.

use crm_core::customer::{Customer, CustomerImage};
use crm_core::types::{CustomerId, Timestamp};
use sqlx::FromRow;

/// A row from the `customers` table.
///
/// The image reference is flattened into two nullable columns; the table's
/// check constraint guarantees they are null or non-null together.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub image_storage_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        let image = match (row.image_url, row.image_storage_id) {
            (Some(url), Some(storage_id)) => Some(CustomerImage { url, storage_id }),
            _ => None,
        };

        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            company: row.company,
            notes: row.notes,
            image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
