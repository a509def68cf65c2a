//! Staging area for files attached to a bulk email.
//!
//! Validation happens before a file enters the set, so a rejected file never
//! disturbs what is already staged.

use thiserror::Error;

/// Per-file upload ceiling.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
];

/// Comma-separated list for the file input's `accept` attribute.
pub const ACCEPT_ATTR: &str = ".pdf,.jpg,.jpeg,.png,.gif";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("{0} is not a valid file type")]
    UnsupportedType(String),
    #[error("{0} exceeds 5MB limit")]
    TooLarge(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    /// `mime` as reported by the browser; guessed from the extension when
    /// absent or empty.
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .or_else(|| mime_from_name(&name).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self { name, mime, bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size_label(&self) -> String {
        format_file_size(self.size())
    }

    pub fn validate(&self) -> Result<(), AttachmentError> {
        if !ALLOWED_MIME_TYPES.contains(&self.mime.as_str()) {
            return Err(AttachmentError::UnsupportedType(self.name.clone()));
        }
        if self.size() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge(self.name.clone()));
        }
        Ok(())
    }
}

pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentSet {
    files: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append.
    pub fn stage(&mut self, attachment: Attachment) -> Result<(), AttachmentError> {
        attachment.validate()?;
        self.files.push(attachment);
        Ok(())
    }

    /// Remove the file at `index`; out-of-range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(Attachment::size).sum()
    }
}

/// `0 Bytes`, `512 Bytes`, `1.50 KB`, `2.00 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} Bytes")
    } else if value < KB * KB {
        format!("{:.2} KB", value / KB)
    } else {
        format!("{:.2} MB", value / (KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, len: usize) -> Attachment {
        Attachment::new(name, Some("application/pdf".into()), vec![0; len])
    }

    #[test]
    fn test_rejected_files_leave_set_untouched() {
        let mut set = AttachmentSet::new();
        set.stage(pdf("a.pdf", 10)).unwrap();

        let big = pdf("big.pdf", MAX_ATTACHMENT_BYTES as usize + 1);
        assert_eq!(
            set.stage(big),
            Err(AttachmentError::TooLarge("big.pdf".into()))
        );

        let exe = Attachment::new("setup.exe", Some("application/x-msdownload".into()), vec![1]);
        assert_eq!(
            set.stage(exe).unwrap_err().to_string(),
            "setup.exe is not a valid file type"
        );

        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|a| a.name.as_str()), Some("a.pdf"));
    }

    #[test]
    fn test_exactly_five_megabytes_is_accepted() {
        let mut set = AttachmentSet::new();
        assert!(set.stage(pdf("edge.pdf", MAX_ATTACHMENT_BYTES as usize)).is_ok());
    }

    #[test]
    fn test_remove_by_index() {
        let mut set = AttachmentSet::new();
        set.stage(pdf("a.pdf", 1)).unwrap();
        set.stage(pdf("b.pdf", 2)).unwrap();

        assert_eq!(set.remove(0).map(|a| a.name), Some("a.pdf".to_string()));
        assert_eq!(set.remove(5), None);
        assert_eq!(set.len(), 1);
        assert_eq!(set.total_bytes(), 2);
    }

    #[test]
    fn test_mime_guessed_from_extension() {
        assert_eq!(Attachment::new("photo.JPG", None, vec![]).mime, "image/jpeg");
        assert_eq!(Attachment::new("x.png", Some(" ".into()), vec![]).mime, "image/png");
        assert_eq!(
            Attachment::new("notes.txt", None, vec![]).mime,
            "application/octet-stream"
        );
        assert_eq!(mime_from_name("noext"), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2.00 MB");
    }
}
