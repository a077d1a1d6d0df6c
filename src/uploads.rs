//! Storage of uploaded product images in the public upload directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use chrono::Utc;
use lazy_static::lazy_static;
use thiserror::Error;

/// URL path under which stored uploads are served.
pub const PUBLIC_UPLOADS_PATH: &str = "/public/uploads";

/// Name used when the client did not send a filename.
const FALLBACK_FILE_NAME: &str = "upload";

lazy_static! {
    /// Accepted image MIME types and the extension stored files receive.
    static ref IMAGE_EXTENSIONS: HashMap<&'static str, &'static str> = HashMap::from([
        ("image/png", "png"),
        ("image/jpeg", "jpeg"),
        ("image/jpg", "jpg"),
    ]);
}

/// Errors raised while accepting an uploaded image.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The declared MIME type is not an accepted image type.
    #[error("invalid image type `{content_type}`")]
    InvalidFileType { content_type: String },
    /// Copying the upload into the public directory failed.
    #[error("failed to store upload: {0}")]
    Io(#[from] io::Error),
}

/// An uploaded file whose MIME type has been accepted.
#[derive(Debug)]
pub struct ImageUpload<'a> {
    file: &'a TempFile,
    extension: &'static str,
}

impl ImageUpload<'_> {
    /// Extension the stored file will receive.
    pub fn extension(&self) -> &'static str {
        self.extension
    }
}

/// Check the declared MIME type of `file` against the accepted image types.
pub fn accept_image(file: &TempFile) -> Result<ImageUpload<'_>, UploadError> {
    let content_type = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_ascii_lowercase());

    match content_type
        .as_deref()
        .and_then(|value| IMAGE_EXTENSIONS.get(value))
    {
        Some(extension) => Ok(ImageUpload { file, extension }),
        None => Err(UploadError::InvalidFileType {
            content_type: content_type.unwrap_or_default(),
        }),
    }
}

/// Accept every file in `files`, failing on the first rejected one.
pub fn accept_images(files: &[TempFile]) -> Result<Vec<ImageUpload<'_>>, UploadError> {
    files.iter().map(accept_image).collect()
}

/// Build the stored filename `<name>-<timestamp>.<extension>`.
///
/// Whitespace in the client-supplied name becomes hyphens and any directory
/// components are dropped.
pub fn stored_file_name(original: Option<&str>, extension: &str, timestamp_millis: i64) -> String {
    let base = original
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_FILE_NAME);

    let sanitized: String = base
        .chars()
        .filter(|ch| !ch.is_control())
        .map(|ch| if ch.is_whitespace() { '-' } else { ch })
        .collect();

    format!("{sanitized}-{timestamp_millis}.{extension}")
}

/// Public URL prefix for stored uploads, ending with a slash.
pub fn public_base_url(scheme: &str, host: &str) -> String {
    format!("{scheme}://{host}{PUBLIC_UPLOADS_PATH}/")
}

/// Directory that receives accepted uploads.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy an accepted upload into the directory and return its stored filename.
    pub fn store(&self, upload: &ImageUpload<'_>) -> Result<String, UploadError> {
        fs::create_dir_all(&self.dir)?;

        let file_name = stored_file_name(
            upload.file.file_name.as_deref(),
            upload.extension,
            Utc::now().timestamp_millis(),
        );
        fs::copy(upload.file.file.path(), self.dir.join(&file_name))?;

        log::info!("Stored upload {file_name}");
        Ok(file_name)
    }

    /// Store every upload, removing the already stored ones if any copy fails.
    pub fn store_all(&self, uploads: &[ImageUpload<'_>]) -> Result<Vec<String>, UploadError> {
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.store(upload) {
                Ok(file_name) => stored.push(file_name),
                Err(err) => {
                    self.discard(&stored);
                    return Err(err);
                }
            }
        }
        Ok(stored)
    }

    /// Remove a stored file.
    pub fn remove(&self, file_name: &str) -> io::Result<()> {
        fs::remove_file(self.dir.join(file_name))
    }

    /// Best-effort removal of stored files after a failed request.
    pub fn discard(&self, file_names: &[String]) {
        for file_name in file_names {
            if let Err(err) = self.remove(file_name) {
                log::warn!("Failed to remove orphaned upload {file_name}: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::mime;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_upload(name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> TempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(bytes).expect("write upload");

        TempFile {
            file,
            content_type: content_type.map(|value| value.parse::<mime::Mime>().expect("mime")),
            file_name: name.map(str::to_string),
            size: bytes.len(),
        }
    }

    #[test]
    fn accepts_allowed_image_types() {
        for (content_type, extension) in [
            ("image/png", "png"),
            ("image/jpeg", "jpeg"),
            ("image/jpg", "jpg"),
        ] {
            let file = temp_upload(Some("a.img"), Some(content_type), b"x");
            let accepted = accept_image(&file).expect("expected image to be accepted");
            assert_eq!(accepted.extension(), extension);
        }
    }

    #[test]
    fn rejects_other_or_missing_types() {
        let gif = temp_upload(Some("a.gif"), Some("image/gif"), b"x");
        assert!(matches!(
            accept_image(&gif),
            Err(UploadError::InvalidFileType { content_type }) if content_type == "image/gif"
        ));

        let untyped = temp_upload(Some("a.png"), None, b"x");
        assert!(matches!(
            accept_image(&untyped),
            Err(UploadError::InvalidFileType { .. })
        ));
    }

    #[test]
    fn accept_images_fails_on_any_rejected_file() {
        let files = vec![
            temp_upload(Some("a.png"), Some("image/png"), b"x"),
            temp_upload(Some("b.pdf"), Some("application/pdf"), b"x"),
        ];

        assert!(accept_images(&files).is_err());
    }

    #[test]
    fn stored_file_name_replaces_whitespace_and_appends_timestamp() {
        assert_eq!(
            stored_file_name(Some("summer  hat.png"), "png", 1_700_000_000_123),
            "summer--hat.png-1700000000123.png"
        );
    }

    #[test]
    fn stored_file_name_drops_directories() {
        assert_eq!(
            stored_file_name(Some("../../etc/passwd"), "jpg", 5),
            "passwd-5.jpg"
        );
        assert_eq!(
            stored_file_name(Some("C:\\photos\\cat.jpg"), "jpg", 5),
            "cat.jpg-5.jpg"
        );
        assert_eq!(stored_file_name(None, "png", 5), "upload-5.png");
        assert_eq!(stored_file_name(Some(".."), "png", 5), "upload-5.png");
    }

    #[test]
    fn public_base_url_points_at_uploads() {
        assert_eq!(
            public_base_url("https", "shop.example.com"),
            "https://shop.example.com/public/uploads/"
        );
    }

    #[test]
    fn store_copies_file_and_remove_deletes_it() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = UploadStore::new(dir.path().join("uploads"));
        let file = temp_upload(Some("red shoe.png"), Some("image/png"), b"png-bytes");
        let accepted = accept_image(&file).expect("accepted");

        let file_name = store.store(&accepted).expect("stored");

        assert!(file_name.starts_with("red-shoe.png-"));
        assert!(file_name.ends_with(".png"));
        let stored_path = store.dir().join(&file_name);
        assert_eq!(fs::read(&stored_path).expect("read stored"), b"png-bytes");

        store.remove(&file_name).expect("removed");
        assert!(!stored_path.exists());
    }
}
