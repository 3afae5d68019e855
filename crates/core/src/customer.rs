//! Customer entity, input DTOs, and field normalization rules.
//!
//! The HTTP layer collects raw form values into [`CustomerFields`] and converts
//! them into either a [`NewCustomer`] (create) or a [`CustomerPatch`] (update).
//! Both conversions trim text, and both enforce that `name` and `email` can
//! never be persisted blank.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CustomerId, Timestamp};

/// Reference to a stored profile image.
///
/// Both parts are always present together; a record either carries a full
/// image reference or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerImage {
    /// Publicly reachable URL of the stored object.
    pub url: String,
    /// Key of the object inside the image storage backend.
    pub storage_id: String,
}

/// A persisted customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<CustomerImage>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Customer {
    /// Build a brand-new record from validated input.
    pub fn create(id: CustomerId, input: NewCustomer, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            company: input.company,
            notes: input.notes,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch in place and bump `updated_at`.
    ///
    /// The image is replaced wholesale when the patch carries one and left
    /// untouched otherwise.
    pub fn apply_patch(&mut self, patch: CustomerPatch, now: Timestamp) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        self.updated_at = now;
    }
}

/// Validated input for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub image: Option<CustomerImage>,
}

/// Validated partial update.
///
/// For `name`/`email`/`image`, `None` leaves the stored value untouched. The
/// optional text fields use a nested option: `None` leaves the field alone,
/// `Some(None)` clears it, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub image: Option<CustomerImage>,
}

/// Raw text fields as submitted by a client, before validation.
///
/// `None` means the field was not submitted at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

/// Names of the text fields accepted from clients.
pub const TEXT_FIELDS: &[&str] = &["name", "email", "phone", "address", "company", "notes"];

impl CustomerFields {
    /// Store a submitted value under its field name.
    ///
    /// Returns `false` for names that are not customer text fields so the
    /// caller can skip them.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "company" => &mut self.company,
            "notes" => &mut self.notes,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Convert into create input. `name` and `email` are required.
    pub fn into_new_customer(self) -> Result<NewCustomer, CoreError> {
        let name = self.name.as_deref().and_then(non_blank);
        let email = self.email.as_deref().and_then(non_blank);

        let (Some(name), Some(email)) = (name, email) else {
            return Err(CoreError::Validation(
                "Name and email are required".to_string(),
            ));
        };

        Ok(NewCustomer {
            name,
            email,
            phone: self.phone.as_deref().and_then(non_blank),
            address: self.address.as_deref().and_then(non_blank),
            company: self.company.as_deref().and_then(non_blank),
            notes: self.notes.as_deref().and_then(non_blank),
            image: None,
        })
    }

    /// Convert into update input. Absent fields stay untouched.
    pub fn into_patch(self) -> Result<CustomerPatch, CoreError> {
        Ok(CustomerPatch {
            name: required_patch("name", self.name)?,
            email: required_patch("email", self.email)?,
            phone: optional_patch(self.phone),
            address: optional_patch(self.address),
            company: optional_patch(self.company),
            notes: optional_patch(self.notes),
            image: None,
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required_patch(field: &str, value: Option<String>) -> Result<Option<String>, CoreError> {
    match value {
        None => Ok(None),
        Some(v) => non_blank(&v)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("{field} must not be blank"))),
    }
}

fn optional_patch(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| non_blank(&v))
}
