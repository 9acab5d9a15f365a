//! Upload validation
//!
//! Checks an uploaded variant file before it reaches the extractor: accepted
//! name or content type, size, and UTF-8 text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// File extensions accepted for upload
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".vcf", ".txt"];

/// Content type accepted for upload regardless of extension
pub const ALLOWED_CONTENT_TYPE: &str = "text/plain";

/// Maximum length of the gender parameter
const MAX_GENDER_LENGTH: usize = 32;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Validation errors for uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Nothing was uploaded
    NoFile,
    /// Neither the name nor the content type is acceptable
    InvalidFileType,
    /// Upload exceeds the size limit
    TooLarge { max: usize, actual: usize },
    /// Upload is not UTF-8 text
    NotUtf8,
    /// A request parameter is invalid
    InvalidParameter(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoFile => write!(f, "No file uploaded."),
            ValidationError::InvalidFileType => {
                write!(f, "Invalid file type. Only .vcf and .txt files are allowed.")
            }
            ValidationError::TooLarge { max, actual } => {
                write!(f, "File upload error: file too large ({} bytes, max: {})", actual, max)
            }
            ValidationError::NotUtf8 => write!(f, "File upload error: file is not UTF-8 text"),
            ValidationError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the file name or the content type is acceptable.
///
/// Either one suffices: a `text/plain` upload with any name is accepted, as
/// is a `.vcf` or `.txt` file with any content type.
pub fn validate_file_type(
    filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<(), ValidationError> {
    let type_ok = content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(ALLOWED_CONTENT_TYPE));
    let name_ok =
        filename.is_some_and(|name| ALLOWED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)));

    if type_ok || name_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidFileType)
    }
}

/// Validate an upload and decode it as text
pub fn validate_upload<'a>(
    filename: Option<&str>,
    content_type: Option<&str>,
    body: &'a [u8],
    max_size: usize,
) -> Result<&'a str, ValidationError> {
    if body.is_empty() && filename.is_none() {
        return Err(ValidationError::NoFile);
    }

    validate_file_type(filename, content_type)?;

    if body.len() > max_size {
        return Err(ValidationError::TooLarge {
            max: max_size,
            actual: body.len(),
        });
    }

    std::str::from_utf8(body).map_err(|_| ValidationError::NotUtf8)
}

/// Validate the optional gender parameter
pub fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if gender.is_empty() || gender.len() > MAX_GENDER_LENGTH {
        return Err(ValidationError::InvalidParameter(format!(
            "gender must be 1-{} characters",
            MAX_GENDER_LENGTH
        )));
    }
    if !gender.chars().all(|c| c.is_alphanumeric() || c == ' ' || c == '-') {
        return Err(ValidationError::InvalidParameter(
            "gender contains unsupported characters".to_string(),
        ));
    }
    Ok(())
}

/// Replace whitespace runs in a file name with `_`
pub fn sanitize_filename(name: &str) -> String {
    WHITESPACE.replace_all(name, "_").into_owned()
}
