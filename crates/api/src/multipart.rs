//! Multipart form parsing for customer create/update requests.

use axum::extract::Multipart;
use crm_core::customer::{CustomerFields, TEXT_FIELDS};
use crm_core::error::CoreError;
use crm_core::upload::{is_empty_file_part, ImageUpload, IMAGE_FIELD};

use crate::error::{AppError, AppResult};

/// A decoded customer form: raw text fields plus an optional image part.
///
/// Nothing is validated yet; the service decides when to validate so that
/// an unknown id is reported before a bad body.
#[derive(Debug, Default)]
pub struct CustomerForm {
    pub fields: CustomerFields,
    pub image: Option<ImagePart>,
}

/// Raw bytes of the `image` file part and the size limit they must meet.
#[derive(Debug)]
pub struct ImagePart {
    pub file_name: String,
    pub data: Vec<u8>,
    pub max_bytes: usize,
}

impl ImagePart {
    /// Check size and format, producing an upload ready for storage.
    pub fn into_upload(self) -> Result<ImageUpload, CoreError> {
        ImageUpload::new(self.file_name, self.data, self.max_bytes)
    }
}

/// Read every part of a customer form.
///
/// - Known text fields are collected into [`CustomerFields`].
/// - The `image` part is only treated as a file when it carries a filename;
///   the empty part browsers send for "no file chosen" is skipped.
/// - Unknown parts are ignored.
pub async fn read_customer_form(
    mut multipart: Multipart,
    max_image_bytes: usize,
) -> AppResult<CustomerForm> {
    let mut form = CustomerForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == IMAGE_FIELD {
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue; // not a file part
            };
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if is_empty_file_part(&file_name, data.len()) {
                continue;
            }
            form.image = Some(ImagePart {
                file_name,
                data: data.to_vec(),
                max_bytes: max_image_bytes,
            });
        } else if TEXT_FIELDS.contains(&name.as_str()) {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.fields.set(&name, text);
        }
    }

    Ok(form)
}
