//! Resume-file intake.
//!
//! Plain text is read verbatim and becomes prompt context. PDF and Word
//! documents are accepted but never parsed: only a placeholder naming the
//! file is stored, matching the documented non-goal of binary decoding.

use std::path::Path;

pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeFormat {
    PlainText,
    Opaque,
}

fn format_for_extension(extension: &str) -> Option<ResumeFormat> {
    match extension.to_lowercase().as_str() {
        "txt" => Some(ResumeFormat::PlainText),
        "pdf" | "doc" | "docx" => Some(ResumeFormat::Opaque),
        _ => None,
    }
}

/// Read a resume file into storable context text.
///
/// Rejects unknown extensions and anything over [`MAX_RESUME_BYTES`] before
/// touching the content.
pub async fn read_resume_file(path: &Path) -> Result<String, crate::Error> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(crate::Error::MissingExtension)?;

    let format = format_for_extension(extension)
        .ok_or_else(|| crate::Error::UnsupportedFormat(extension.to_lowercase()))?;

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_RESUME_BYTES {
        return Err(crate::Error::FileTooLarge(MAX_RESUME_BYTES));
    }

    match format {
        ResumeFormat::PlainText => Ok(tokio::fs::read_to_string(path).await?),
        ResumeFormat::Opaque => {
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or(crate::Error::MissingExtension)?;
            Ok(format!("Resume uploaded: {filename}"))
        }
    }
}
