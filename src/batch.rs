//! Batch orchestration: every uploaded image against every catalog prompt.
//!
//! Pairs run one at a time in canonical order. Images form the outer loop in
//! input order and prompts the inner loop in catalog order. Results appear in
//! exactly that order, and each pair's parts keep the order the client
//! returned them in. A failed pair is logged and recorded as
//! [`PairOutcome::Failed`]. It never stops the remaining pairs.

use crate::{
    encoder::encode_image,
    error::{GenerationFailure, PassportError, Result},
    gemini::GenerationClient,
    logger,
    models::{passport_catalog, GeneratedImage, PromptSpec, UploadedImage},
};

/// What happened to a single (image, prompt) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    Generated {
        file_name: String,
        prompt: PromptSpec,
        images: Vec<GeneratedImage>,
    },
    Failed(GenerationFailure),
}

impl PairOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PairOutcome::Failed(_))
    }

    pub fn images(&self) -> &[GeneratedImage] {
        match self {
            PairOutcome::Generated { images, .. } => images,
            PairOutcome::Failed(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    /// One entry per attempted pair, in canonical order.
    pub fn outcomes(&self) -> &[PairOutcome] {
        &self.outcomes
    }

    pub fn images(&self) -> impl Iterator<Item = &GeneratedImage> {
        self.outcomes.iter().flat_map(|outcome| outcome.images())
    }

    pub fn into_images(self) -> Vec<GeneratedImage> {
        self.outcomes
            .into_iter()
            .flat_map(|outcome| match outcome {
                PairOutcome::Generated { images, .. } => images,
                PairOutcome::Failed(_) => Vec::new(),
            })
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenerationFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PairOutcome::Failed(failure) => Some(failure),
            PairOutcome::Generated { .. } => None,
        })
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

pub struct BatchOrchestrator<'a, C: GenerationClient + ?Sized> {
    client: &'a C,
    prompts: &'a [PromptSpec],
}

impl<'a, C: GenerationClient + ?Sized> BatchOrchestrator<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            prompts: passport_catalog(),
        }
    }

    pub fn with_prompts(mut self, prompts: &'a [PromptSpec]) -> Self {
        self.prompts = prompts;
        self
    }

    /// Runs every pair to completion. Only an unreadable image aborts the
    /// batch; per-pair generation failures are contained in the report.
    pub async fn run(&self, images: &[UploadedImage]) -> Result<BatchReport> {
        let _timer = logger::timer("passport batch");
        log::info!(
            "Generating {} variants for {} image(s)",
            images.len() * self.prompts.len(),
            images.len()
        );

        let mut outcomes = Vec::with_capacity(images.len() * self.prompts.len());

        for image in images {
            let encoded = encode_image(image).await.map_err(|e| {
                PassportError::Batch(format!("could not read {}: {}", image.file_name, e))
            })?;

            for prompt in self.prompts {
                let outcome = match self.client.generate(&encoded, prompt).await {
                    Ok(parts) => {
                        log::debug!(
                            "{} returned {} image(s) for prompt \"{}\"",
                            image.file_name,
                            parts.len(),
                            prompt
                        );
                        PairOutcome::Generated {
                            file_name: image.file_name.clone(),
                            prompt: *prompt,
                            images: parts
                                .iter()
                                .map(|part| {
                                    GeneratedImage::from_part(part, &image.file_name, prompt.text())
                                })
                                .collect(),
                        }
                    }
                    Err(cause) => {
                        let failure =
                            GenerationFailure::new(image.file_name.clone(), prompt.text(), cause);
                        log::error!(
                            "Error generating image for {} with prompt: \"{}\": {}",
                            failure.file_name,
                            failure.prompt,
                            failure.cause
                        );
                        PairOutcome::Failed(failure)
                    }
                };
                outcomes.push(outcome);
            }
        }

        let report = BatchReport { outcomes };
        log::info!(
            "Batch finished: {} of {} pair(s) succeeded, {} image(s) generated",
            report.succeeded(),
            report.outcomes().len(),
            report.images().count()
        );
        Ok(report)
    }
}

/// Validates the upload set and runs the default catalog over it.
pub async fn generate_passport_report<C: GenerationClient + ?Sized>(
    client: &C,
    images: &[UploadedImage],
) -> Result<BatchReport> {
    if images.is_empty() {
        return Err(PassportError::EmptyBatch);
    }
    BatchOrchestrator::new(client).run(images).await
}

pub async fn generate_passport_photos<C: GenerationClient + ?Sized>(
    client: &C,
    images: &[UploadedImage],
) -> Result<Vec<GeneratedImage>> {
    Ok(generate_passport_report(client, images)
        .await?
        .into_images())
}
