//! File extension derivation and resource-family classification.
//!
//! The provider's delivery taxonomy is inferred heuristically from the file
//! extension. The classification only picks which family is tried *first*;
//! the locator always tries the alternate family too, to tolerate
//! misclassified historical records without a backfill migration.

use regex::Regex;
use std::sync::LazyLock;

/// Extensions stored under the "raw" resource family
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "ppt", "pptx",
];

/// Extensions stored under the "image" resource family
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "svg", "ico",
];

/// Fallback extension when neither filename nor URL carries one
pub const DEFAULT_EXTENSION: &str = "pdf";

/// The provider's classification of a stored object, which affects the URL
/// shape used to retrieve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFamily {
    /// Documents and anything unrecognized
    Raw,
    /// Image formats
    Image,
}

impl ResourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceFamily::Raw => "raw",
            ResourceFamily::Image => "image",
        }
    }

    /// The other family, used as the second guess per delivery type.
    pub fn alternate(&self) -> ResourceFamily {
        match self {
            ResourceFamily::Raw => ResourceFamily::Image,
            ResourceFamily::Image => ResourceFamily::Raw,
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Last path segment of a URL, with query string and fragment stripped.
fn last_url_segment(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Derive a file extension: prefer the one parsed from the filename, then
/// from the last path segment of the stored URL, then default to `pdf`.
pub fn derive_extension(file_name: &str, file_url: &str) -> String {
    extension_of(file_name)
        .or_else(|| last_url_segment(file_url).and_then(extension_of))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Classify an extension into the resource family to try first. Unlisted
/// extensions are treated as documents.
pub fn classify(extension: &str) -> ResourceFamily {
    if IMAGE_EXTENSIONS.contains(&extension) {
        ResourceFamily::Image
    } else {
        ResourceFamily::Raw
    }
}

static VERSION_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v(\d+)/").expect("valid version regex"));

/// Extract the provider's cache-busting version token from a stored URL.
/// Signed URLs must pin the same object version as the original upload or
/// the signature will mismatch.
pub fn extract_version(file_url: &str) -> Option<String> {
    VERSION_SEGMENT
        .captures(file_url)
        .map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_filename_lowercased_last_segment() {
        assert_eq!(derive_extension("report.final.PDF", ""), "pdf");
        assert_eq!(derive_extension("notes.docx", "https://x/y/z.png"), "docx");
    }

    #[test]
    fn test_extension_falls_back_to_url_segment() {
        assert_eq!(
            derive_extension("", "https://res.example.com/demo/image/upload/v17/abc123.png"),
            "png"
        );
        assert_eq!(
            derive_extension("nodot", "https://res.example.com/demo/raw/upload/abc123.PDF?x=1"),
            "pdf"
        );
    }

    #[test]
    fn test_extension_defaults_to_pdf() {
        assert_eq!(derive_extension("", ""), "pdf");
        assert_eq!(derive_extension("nodot", "https://res.example.com/nodot"), "pdf");
    }

    #[test]
    fn test_classify_families() {
        assert_eq!(classify("docx"), ResourceFamily::Raw);
        assert_eq!(classify("png"), ResourceFamily::Image);
        // Unlisted extensions fall back to raw
        assert_eq!(classify("exe"), ResourceFamily::Raw);
    }

    #[test]
    fn test_alternate_family() {
        assert_eq!(ResourceFamily::Raw.alternate(), ResourceFamily::Image);
        assert_eq!(ResourceFamily::Image.alternate(), ResourceFamily::Raw);
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(
            extract_version("https://res.example.com/demo/raw/upload/v1712345/abc.pdf"),
            Some("1712345".to_string())
        );
        assert_eq!(
            extract_version("https://res.example.com/demo/raw/upload/abc.pdf"),
            None
        );
    }
}
