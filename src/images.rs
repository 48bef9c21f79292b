//! Image acquisition pipeline
//!
//! For each raw image reference in an extracted record: derive a stable id
//! from the image URL, download the binary, and emit a normalized image
//! record only when the download succeeds. Partial success is the normal
//! case — a failed image is dropped without failing its article.

use crate::crawler::RawImageRef;
use crate::ids::hash_id;
use crate::store::ImageRecord;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Extensions accepted from the URL path suffix
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Extension used when the suffix is absent or not a recognized image type
const FALLBACK_EXTENSION: &str = "jpg";

/// Per-image download timeout
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads article images into a site's `image/` directory
pub struct ImagePipeline {
    client: Client,
    image_dir: PathBuf,
}

impl ImagePipeline {
    /// Creates the pipeline, ensuring the image directory exists before any
    /// write can happen.
    pub fn new(image_dir: PathBuf, user_agent: &str) -> crate::Result<Self> {
        std::fs::create_dir_all(&image_dir)?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;

        Ok(Self { client, image_dir })
    }

    /// Runs the raw references through download, keeping the successes.
    ///
    /// Empty and data-embedded URLs are skipped outright. The image id is a
    /// pure function of the image URL, so repeated runs reuse the same
    /// filenames. Captions fall back to the alt text when empty.
    pub async fn process(&self, refs: &[RawImageRef]) -> Vec<ImageRecord> {
        let mut records = Vec::new();

        for image in refs {
            if image.url.is_empty() || !image.url.starts_with("http") {
                continue;
            }

            let id = hash_id(&image.url);

            match self.download(&image.url, &id).await {
                Ok(()) => {
                    let caption = if image.caption.is_empty() {
                        image.alt.clone()
                    } else {
                        image.caption.clone()
                    };
                    records.push(ImageRecord {
                        id,
                        caption,
                        author: image.author.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Dropping image {}: {}", image.url, e);
                }
            }
        }

        records
    }

    async fn download(&self, url: &str, id: &str) -> crate::Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let filename = format!("{}.{}", id, infer_extension(url));
        tokio::fs::write(self.image_dir.join(filename), &bytes).await?;

        Ok(())
    }
}

/// Infers the on-disk extension from the URL's path suffix, query stripped
fn infer_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);

    match file.rsplit_once('.') {
        Some((_, suffix)) => {
            let suffix = suffix.to_ascii_lowercase();
            if IMAGE_EXTENSIONS.contains(&suffix.as_str()) {
                suffix
            } else {
                FALLBACK_EXTENSION.to_string()
            }
        }
        None => FALLBACK_EXTENSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn image_ref(url: &str) -> RawImageRef {
        RawImageRef {
            url: url.to_string(),
            caption: String::new(),
            alt: String::new(),
            author: String::new(),
        }
    }

    #[test]
    fn test_infer_extension_recognized() {
        assert_eq!(infer_extension("https://e.com/a/photo.png"), "png");
        assert_eq!(infer_extension("https://e.com/photo.JPEG"), "jpeg");
        assert_eq!(infer_extension("https://e.com/anim.webp"), "webp");
    }

    #[test]
    fn test_infer_extension_strips_query() {
        assert_eq!(infer_extension("https://e.com/photo.png?w=640&h=480"), "png");
    }

    #[test]
    fn test_infer_extension_fallback() {
        assert_eq!(infer_extension("https://e.com/photo"), "jpg");
        assert_eq!(infer_extension("https://e.com/photo.php"), "jpg");
        assert_eq!(infer_extension("https://e.com/"), "jpg");
    }

    #[test]
    fn test_infer_extension_ignores_dots_in_directories() {
        assert_eq!(infer_extension("https://e.com/v1.2/photo"), "jpg");
    }

    #[tokio::test]
    async fn test_successful_download_produces_record_and_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/photo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path().join("image"), "TestAgent/1.0").unwrap();

        let url = format!("{}/photo.png", server.uri());
        let records = pipeline.process(&[image_ref(&url)]).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, hash_id(&url));

        let file = dir.path().join("image").join(format!("{}.png", records[0].id));
        assert_eq!(std::fs::read(file).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[tokio::test]
    async fn test_failed_download_dropped_without_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path().join("image"), "TestAgent/1.0").unwrap();

        let records = pipeline
            .process(&[
                image_ref(&format!("{}/gone.jpg", server.uri())),
                image_ref(&format!("{}/ok.jpg", server.uri())),
            ])
            .await;

        // Only the successful download appears, order preserved
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, hash_id(&format!("{}/ok.jpg", server.uri())));
    }

    #[tokio::test]
    async fn test_empty_and_data_urls_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path().join("image"), "TestAgent/1.0").unwrap();

        let records = pipeline
            .process(&[
                image_ref(""),
                image_ref("data:image/gif;base64,R0lGOD"),
            ])
            .await;

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_caption_falls_back_to_alt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path().join("image"), "TestAgent/1.0").unwrap();

        let mut without_caption = image_ref(&format!("{}/a.jpg", server.uri()));
        without_caption.alt = "alt text".to_string();

        let mut with_caption = image_ref(&format!("{}/b.jpg", server.uri()));
        with_caption.caption = "explicit caption".to_string();
        with_caption.alt = "ignored alt".to_string();

        let records = pipeline.process(&[without_caption, with_caption]).await;

        assert_eq!(records[0].caption, "alt text");
        assert_eq!(records[1].caption, "explicit caption");
    }
}
