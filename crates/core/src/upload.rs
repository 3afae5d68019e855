//! Profile image upload rules.
//!
//! Uploads are identified by sniffing the header bytes, never by trusting
//! the client-supplied filename or content type.

use image::ImageFormat;

use crate::error::CoreError;

/// Multipart field name carrying the image file.
pub const IMAGE_FIELD: &str = "image";

/// Default maximum image size (1 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Image formats accepted for profile pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageKind {
    /// Canonical file extension used for stored objects.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }

    /// MIME type served for stored objects.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }

    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }
}

/// An image file received from a client, validated and ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original filename, kept for logging only.
    pub file_name: String,
    pub kind: ImageKind,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Validate raw upload bytes against the size limit and accepted formats.
    pub fn new(file_name: String, data: Vec<u8>, max_bytes: usize) -> Result<Self, CoreError> {
        if data.is_empty() {
            return Err(CoreError::Validation("Image file is empty".to_string()));
        }
        if data.len() > max_bytes {
            return Err(CoreError::Validation(format!(
                "Image must be {max_bytes} bytes or less (got {})",
                data.len()
            )));
        }

        let kind = image::guess_format(&data)
            .ok()
            .and_then(ImageKind::from_format)
            .ok_or_else(|| {
                CoreError::Validation(
                    "Unsupported image format. Supported: png, jpeg, gif, webp".to_string(),
                )
            })?;

        Ok(Self {
            file_name,
            kind,
            data,
        })
    }
}

/// Whether a file part is the placeholder a browser sends when no file was
/// chosen (empty filename and no content).
pub fn is_empty_file_part(file_name: &str, len: usize) -> bool {
    file_name.is_empty() && len == 0
}
