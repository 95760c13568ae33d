//! The document a user hands to the analysis service.

use std::path::Path;

/// File bytes plus the metadata sent with the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an upload from disk, naming it after the final path component.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// MIME type by file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("lease.pdf"), "application/pdf");
        assert_eq!(content_type_for("LEASE.PDF"), "application/pdf");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("archive"), "application/octet-stream");
        assert_eq!(content_type_for("image.png"), "application/octet-stream");
    }

    #[test]
    fn from_path_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nda.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.7 fake").unwrap();

        let upload = DocumentUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "nda.pdf");
        assert_eq!(upload.content_type, "application/pdf");
        assert_eq!(upload.len(), 13);
        assert!(!upload.is_empty());
    }

    #[test]
    fn from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DocumentUpload::from_path(&dir.path().join("missing.pdf")).is_err());
    }

    #[test]
    fn zero_byte_upload_is_empty() {
        assert!(DocumentUpload::new("blank.pdf", Vec::new()).is_empty());
    }
}
