//! Passport-style photo variants from the Gemini image model.
//!
//! Every uploaded photo is sent once per catalog prompt. Failures of single
//! pairs are contained, and the results come back as one flat list tagged
//! with the source file name and prompt.

pub mod batch;
pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gallery;
pub mod gemini;
pub mod logger;
pub mod models;

pub use batch::{
    generate_passport_photos, generate_passport_report, BatchOrchestrator, BatchReport,
    PairOutcome,
};
pub use config::{Config, GeminiConfig};
pub use encoder::encode_image;
pub use error::{GenerationCause, GenerationFailure, PassportError, Result};
pub use gallery::{export, group_by_file_name, group_by_upload, ImageGroup};
pub use gemini::{GeminiClient, GenerationClient, ImageClient};
pub use models::{
    passport_catalog, EncodedPart, GeneratedImage, ImagePart, ImageSource, PromptSpec,
    UploadedImage, PASSPORT_PROMPTS,
};
