use crate::error::{PassportError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where an upload's bytes live until they are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Memory(Vec<u8>),
    File(PathBuf),
}

/// A user-supplied photo. The file name doubles as the grouping key for results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime_type: String,
    pub source: ImageSource,
}

impl UploadedImage {
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            source: ImageSource::Memory(bytes.into()),
        }
    }

    /// File-backed upload; the bytes are read when the image is encoded.
    /// Only PNG, JPEG and WEBP are accepted.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PassportError::UnsupportedImageType(format!("{}", path.display()))
            })?
            .to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let mime_type = mime_for_extension(extension)
            .ok_or_else(|| PassportError::UnsupportedImageType(file_name.clone()))?;

        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            source: ImageSource::File(path.to_path_buf()),
        })
    }
}

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Base64 payload ready to be sent inline to the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPart {
    pub mime_type: String,
    pub data: String,
}

/// An image returned by the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: String,
}

impl ImagePart {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Directly renderable `data:` URI.
    pub src: String,
    pub original_file_name: String,
    pub prompt: String,
}

impl GeneratedImage {
    pub fn from_part(part: &ImagePart, original_file_name: &str, prompt: &str) -> Self {
        Self {
            src: format!("data:{};base64,{}", part.mime_type, part.data),
            original_file_name: original_file_name.to_string(),
            prompt: prompt.to_string(),
        }
    }

    /// Splits `src` back into its MIME type and raw bytes.
    pub fn decode(&self) -> Result<(String, Vec<u8>)> {
        let rest = self
            .src
            .strip_prefix("data:")
            .ok_or_else(|| PassportError::InvalidDataUri("missing data: scheme".into()))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| PassportError::InvalidDataUri("missing ;base64, marker".into()))?;
        if mime_type.is_empty() {
            return Err(PassportError::InvalidDataUri("empty MIME type".into()));
        }
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| PassportError::InvalidDataUri(e.to_string()))?;
        Ok((mime_type.to_string(), bytes))
    }
}
