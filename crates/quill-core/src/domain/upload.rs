//! Uploaded cover images and the rules they have to satisfy.

use chrono::{DateTime, Utc};
use image::ImageFormat;

use crate::error::DomainError;

/// Default upload ceiling: 1999 KiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1999 * 1024;

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Content type declared by the client. Informational only.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Format sniffed from the leading bytes.
    pub fn image_format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }

    /// Name to store the file under: `{basename}_{unix seconds}.{extension}`.
    pub fn stored_name(&self, at: DateTime<Utc>) -> String {
        let (stem, extension) = split_file_name(&self.original_name);
        match extension {
            Some(ext) => format!("{}_{}.{}", stem, at.timestamp(), ext),
            None => format!("{}_{}", stem, at.timestamp()),
        }
    }
}

/// Splits a client filename into basename and extension.
///
/// Directory components are dropped. A leading dot does not start an
/// extension, so `.png` is a basename. A trailing dot is an empty extension
/// and is kept.
fn split_file_name(original: &str) -> (&str, Option<&str>) {
    let name = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original);

    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
    }
}

/// Constraints on cover image uploads.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// The file must be a recognisable image no larger than `max_bytes`.
    pub fn check(&self, file: &UploadedFile) -> Result<ImageFormat, DomainError> {
        if file.len() > self.max_bytes {
            return Err(DomainError::Validation(format!(
                "cover_image may not be greater than {} kilobytes",
                self.max_bytes / 1024
            )));
        }

        file.image_format()
            .ok_or_else(|| DomainError::Validation("cover_image must be an image".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_stored_name_appends_timestamp() {
        let file = UploadedFile::new("photo.png", PNG_HEADER.to_vec());
        assert_eq!(file.stored_name(at(1_700_000_000)), "photo_1700000000.png");
    }

    #[test]
    fn test_stored_name_keeps_inner_dots() {
        let file = UploadedFile::new("my.holiday.photo.jpeg", vec![]);
        assert_eq!(file.stored_name(at(42)), "my.holiday.photo_42.jpeg");
    }

    #[test]
    fn test_stored_name_without_extension() {
        let file = UploadedFile::new("snapshot", vec![]);
        assert_eq!(file.stored_name(at(42)), "snapshot_42");

        let dotfile = UploadedFile::new(".png", vec![]);
        assert_eq!(dotfile.stored_name(at(42)), ".png_42");
    }

    #[test]
    fn test_stored_name_keeps_trailing_dot() {
        let file = UploadedFile::new("photo.", vec![]);
        assert_eq!(file.stored_name(at(42)), "photo_42.");
    }

    #[test]
    fn test_stored_name_strips_client_directories() {
        let file = UploadedFile::new("C:\\Users\\me\\cat.gif", vec![]);
        assert_eq!(file.stored_name(at(7)), "cat_7.gif");

        let file = UploadedFile::new("../../etc/cat.gif", vec![]);
        assert_eq!(file.stored_name(at(7)), "cat_7.gif");
    }

    #[test]
    fn test_policy_accepts_png() {
        let file = UploadedFile::new("photo.png", PNG_HEADER.to_vec());
        let format = UploadPolicy::default().check(&file).unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_policy_rejects_non_image() {
        let file = UploadedFile::new("notes.png", b"just some text".to_vec())
            .with_content_type("image/png");
        let err = UploadPolicy::default().check(&file).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_policy_rejects_oversized_file() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(DEFAULT_MAX_UPLOAD_BYTES + 1, 0);
        let file = UploadedFile::new("big.png", bytes);

        let err = UploadPolicy::default().check(&file).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("1999 kilobytes")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
