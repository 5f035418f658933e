use clap::Parser;
use passport_gen::{
    cli::Cli, export, generate_passport_report, group_by_upload, logger, Config, GeminiClient,
    PassportError, UploadedImage,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedImage<'a> {
    path: PathBuf,
    original_file_name: &'a str,
    prompt: &'a str,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let env_loaded = dotenv::dotenv().is_ok();

    // Credential check comes first: nothing runs without it.
    let config = match Config::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::init_with_config(config.logger_config()) {
        eprintln!("❌ {}", e);
        return ExitCode::FAILURE;
    }
    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }
    logger::log_config_info(&config);

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(PassportError::EmptyBatch) => {
            eprintln!("Please upload at least one image.");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Failed to generate images. Please check the logs for details.");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> passport_gen::Result<()> {
    let uploads = cli
        .images
        .iter()
        .map(UploadedImage::from_path)
        .collect::<passport_gen::Result<Vec<_>>>()?;

    let client = GeminiClient::new(config.gemini.clone())?;
    let report = generate_passport_report(&client, &uploads).await?;
    let results = report.into_images();

    for group in group_by_upload(&uploads, &results) {
        log::info!("🖼️  {}: {} variant(s)", group.file_name, group.images.len());
    }
    if results.is_empty() {
        log::warn!("⚠️  No images were generated");
        return Ok(());
    }

    let paths = export(&results, &config.output_dir).await?;
    let manifest: Vec<ExportedImage<'_>> = paths
        .into_iter()
        .zip(&results)
        .map(|(path, image)| ExportedImage {
            path,
            original_file_name: &image.original_file_name,
            prompt: &image.prompt,
        })
        .collect();

    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| PassportError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
