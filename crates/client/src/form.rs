//! Customer form as submitted by the client, with local validation rules.

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::error::ClientResult;

/// Largest image the form accepts.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// An image file picked for upload.
///
/// Serializes without its bytes; validation errors only report the name
/// and content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Input for create and update.
///
/// The same form is used for both operations; update sends the full form.
#[derive(Debug, Clone, Default, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 2, max = 15))]
    pub name: String,
    #[validate(email, length(max = 25))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 50))]
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub company: Option<String>,
    #[validate(length(max = 200))]
    pub notes: Option<String>,
    #[validate(custom(function = "validate_image_size"))]
    pub image: Option<ImageFile>,
}

impl CustomerForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn image(mut self, image: ImageFile) -> Self {
        self.image = Some(image);
        self
    }

    /// Encode for create. Absent optional fields are omitted.
    pub fn to_multipart(&self) -> ClientResult<Form> {
        self.encode(false)
    }

    /// Encode for update. Absent optional fields are sent empty so the
    /// server clears them; an absent image keeps the stored one.
    pub fn to_update_multipart(&self) -> ClientResult<Form> {
        self.encode(true)
    }

    fn encode(&self, clear_absent: bool) -> ClientResult<Form> {
        let mut form = Form::new()
            .text("name", self.name.clone())
            .text("email", self.email.clone());

        for (field, value) in [
            ("phone", &self.phone),
            ("address", &self.address),
            ("company", &self.company),
            ("notes", &self.notes),
        ] {
            match value {
                Some(value) => form = form.text(field, value.clone()),
                None if clear_absent => form = form.text(field, ""),
                None => {}
            }
        }

        if let Some(image) = &self.image {
            let part = Part::bytes(image.data.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}

fn validate_image_size(image: &ImageFile) -> Result<(), ValidationError> {
    if image.data.len() > MAX_IMAGE_BYTES {
        let mut err = ValidationError::new("image_too_large");
        err.message = Some(format!("Image must be {MAX_IMAGE_BYTES} bytes or less").into());
        return Err(err);
    }
    Ok(())
}
