use crate::{
    error::Result,
    models::{EncodedPart, ImageSource, UploadedImage},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Reads the upload fully and base64-encodes it with its declared MIME type.
pub async fn encode_image(image: &UploadedImage) -> Result<EncodedPart> {
    let data = match &image.source {
        ImageSource::Memory(bytes) => STANDARD.encode(bytes),
        ImageSource::File(path) => {
            let bytes = tokio::fs::read(path).await?;
            STANDARD.encode(bytes)
        }
    };

    log::debug!(
        "Encoded {} ({}, {} base64 chars)",
        image.file_name,
        image.mime_type,
        data.len()
    );

    Ok(EncodedPart {
        mime_type: image.mime_type.clone(),
        data,
    })
}
