use crate::{
    error::Result,
    models::{extension_for_mime, GeneratedImage, UploadedImage},
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup<'a> {
    pub file_name: &'a str,
    pub images: Vec<&'a GeneratedImage>,
}

/// One group per upload, in upload order, including uploads with no results.
/// Uploads sharing a file name share a key, so only the first of them gets a
/// group.
pub fn group_by_upload<'a>(
    uploads: &'a [UploadedImage],
    results: &'a [GeneratedImage],
) -> Vec<ImageGroup<'a>> {
    let mut by_name: HashMap<&str, Vec<&GeneratedImage>> = HashMap::new();
    for image in results {
        by_name
            .entry(image.original_file_name.as_str())
            .or_default()
            .push(image);
    }

    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    for upload in uploads {
        if !seen.insert(upload.file_name.as_str()) {
            continue;
        }
        groups.push(ImageGroup {
            file_name: &upload.file_name,
            images: by_name.remove(upload.file_name.as_str()).unwrap_or_default(),
        });
    }
    groups
}

/// Groups by first appearance in `results`.
pub fn group_by_file_name(results: &[GeneratedImage]) -> Vec<ImageGroup<'_>> {
    let mut groups: Vec<ImageGroup<'_>> = Vec::new();
    for image in results {
        match groups
            .iter_mut()
            .find(|group| group.file_name == image.original_file_name)
        {
            Some(group) => group.images.push(image),
            None => groups.push(ImageGroup {
                file_name: &image.original_file_name,
                images: vec![image],
            }),
        }
    }
    groups
}

/// Writes each result to `dir` as `passport-photo-<millis>-<index>.<ext>`.
pub async fn export(results: &[GeneratedImage], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let stamp = Utc::now().timestamp_millis();
    let mut written = Vec::with_capacity(results.len());
    for (index, image) in results.iter().enumerate() {
        let (mime_type, bytes) = image.decode()?;
        let path = dir.join(format!(
            "passport-photo-{}-{}.{}",
            stamp,
            index,
            extension_for_mime(&mime_type)
        ));
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Saved {} ({})", path.display(), image.original_file_name);
        written.push(path);
    }

    log::info!("📁 Exported {} image(s) to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PassportError;
    use crate::models::ImagePart;

    fn result(file: &str, prompt: &str, data: &str) -> GeneratedImage {
        GeneratedImage::from_part(&ImagePart::new("image/png", data), file, prompt)
    }

    fn upload(name: &str) -> UploadedImage {
        UploadedImage::from_bytes(name, "image/png", Vec::new())
    }

    #[test]
    fn test_group_by_upload_follows_upload_order() {
        let uploads = vec![upload("b.png"), upload("a.png"), upload("empty.png")];
        let results = vec![
            result("a.png", "p1", "AA=="),
            result("b.png", "p1", "AQ=="),
            result("a.png", "p2", "Ag=="),
        ];

        let groups = group_by_upload(&uploads, &results);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].file_name, "b.png");
        assert_eq!(groups[0].images.len(), 1);
        assert_eq!(groups[1].file_name, "a.png");
        let prompts: Vec<_> = groups[1].images.iter().map(|i| i.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["p1", "p2"]);
        assert_eq!(groups[2].file_name, "empty.png");
        assert!(groups[2].images.is_empty());
    }

    #[test]
    fn test_upload_with_only_failures_keeps_its_group() {
        let uploads = vec![upload("a.png"), upload("b.png")];
        let results = vec![result("a.png", "p1", "AA==")];

        let groups = group_by_upload(&uploads, &results);
        let summary: Vec<_> = groups
            .iter()
            .map(|g| (g.file_name, g.images.len()))
            .collect();
        assert_eq!(summary, vec![("a.png", 1), ("b.png", 0)]);
    }

    #[test]
    fn test_duplicate_upload_names_share_one_group() {
        let uploads = vec![upload("me.png"), upload("me.png")];
        let results = vec![result("me.png", "p1", "AA=="), result("me.png", "p1", "AQ==")];

        let groups = group_by_upload(&uploads, &results);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].images.len(), 2);
    }

    #[test]
    fn test_group_by_file_name_first_appearance() {
        let results = vec![
            result("z.png", "p1", "AA=="),
            result("y.png", "p1", "AA=="),
            result("z.png", "p2", "AA=="),
        ];
        let groups = group_by_file_name(&results);
        let names: Vec<_> = groups.iter().map(|g| g.file_name).collect();
        assert_eq!(names, vec!["z.png", "y.png"]);
        assert_eq!(groups[0].images.len(), 2);
    }

    #[tokio::test]
    async fn test_export_writes_decoded_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let results = vec![
            result("a.png", "p1", "aGVsbG8="),
            GeneratedImage::from_part(&ImagePart::new("image/jpeg", "d29ybGQ="), "a.png", "p2"),
        ];

        let paths = export(&results, &out).await.unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].to_string_lossy().ends_with("-0.png"));
        assert!(paths[1].to_string_lossy().ends_with("-1.jpg"));
        assert_eq!(std::fs::read(&paths[0]).unwrap(), b"hello");
        assert_eq!(std::fs::read(&paths[1]).unwrap(), b"world");
    }

    #[tokio::test]
    async fn test_export_rejects_bad_src() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = result("a.png", "p", "AA==");
        bad.src = "not-a-data-uri".into();

        let err = export(&[bad], dir.path()).await.unwrap_err();
        assert!(matches!(err, PassportError::InvalidDataUri(_)));
    }
}
