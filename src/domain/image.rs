//! Blood-smear image uploads and their client-side validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Largest accepted upload (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// MIME type sent with the multipart part.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Detect the format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detect the format from a MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Check the leading magic bytes.
    #[must_use]
    pub fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Png => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        }
    }
}

/// Metadata kept with each detection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
}

/// A validated image ready for submission.
#[derive(Clone)]
pub struct ImageUpload {
    file_name: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Build an upload from in-memory bytes and a declared MIME type.
    ///
    /// # Errors
    /// Returns a validation error if the type is not jpeg/png or the
    /// payload exceeds [`MAX_IMAGE_BYTES`].
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let format = ImageFormat::from_mime(mime)
            .ok_or_else(|| ValidationError::UnsupportedImageType(mime.to_string()))?;
        check_size(bytes.len() as u64)?;

        Ok(Self {
            file_name: file_name.into(),
            format,
            bytes,
        })
    }

    /// Load an upload from disk.
    ///
    /// The size is checked against file metadata before the file is read.
    ///
    /// # Errors
    /// Returns a validation error for unsupported or oversized files, or
    /// when the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = ImageFormat::from_extension(ext)
            .ok_or_else(|| ValidationError::UnsupportedImageType(format!(".{ext}")))?;

        let metadata = std::fs::metadata(path)
            .map_err(|e| ValidationError::UnreadableImage(format!("{}: {e}", path.display())))?;
        check_size(metadata.len())?;

        let bytes = std::fs::read(path)
            .map_err(|e| ValidationError::UnreadableImage(format!("{}: {e}", path.display())))?;
        check_size(bytes.len() as u64)?;

        if !format.matches_signature(&bytes) {
            return Err(ValidationError::UnsupportedImageType(format!(
                "content of {} is not {}",
                path.display(),
                format.mime_type()
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Metadata stored alongside the detection.
    #[must_use]
    pub fn metadata(&self) -> ImageMetadata {
        ImageMetadata {
            file_name: self.file_name.clone(),
            file_size: self.size(),
            file_type: self.format.mime_type().to_string(),
        }
    }
}

fn check_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge {
            size,
            max: MAX_IMAGE_BYTES,
        });
    }
    if size == 0 {
        return Err(ValidationError::UnreadableImage("image is empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_rejects_oversized_bytes() {
        let bytes = vec![0u8; (MAX_IMAGE_BYTES + 1) as usize];
        let err = ImageUpload::from_bytes("big.png", "image/png", bytes).unwrap_err();
        assert!(matches!(err, ValidationError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_accepts_exact_limit() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES as usize];
        assert!(ImageUpload::from_bytes("edge.jpg", "image/jpeg", bytes).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = ImageUpload::from_bytes("scan.gif", "image/gif", vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedImageType(_)));
    }

    #[test]
    fn test_from_path_png() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let path = dir.path().join("smear.PNG");
        let mut file = std::fs::File::create(&path).expect("Should create file");
        file.write_all(&PNG_HEADER).expect("Should write");
        file.write_all(&[0u8; 64]).expect("Should write");
        drop(file);

        let upload = ImageUpload::from_path(&path).expect("Should load");
        assert_eq!(upload.format(), ImageFormat::Png);
        assert_eq!(upload.file_name(), "smear.PNG");

        let meta = upload.metadata();
        assert_eq!(meta.file_size, 72);
        assert_eq!(meta.file_type, "image/png");
    }

    #[test]
    fn test_from_path_rejects_oversized_file() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let path = dir.path().join("huge.jpg");
        let file = std::fs::File::create(&path).expect("Should create file");
        file.set_len(MAX_IMAGE_BYTES + 10).expect("Should extend");

        let err = ImageUpload::from_path(&path).unwrap_err();
        assert!(matches!(err, ValidationError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_from_path_rejects_mismatched_content() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, PNG_HEADER).expect("Should write");

        let err = ImageUpload::from_path(&path).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedImageType(_)));
    }
}
