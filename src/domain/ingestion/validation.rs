//! Upload file name checks

use crate::domain::DomainError;

/// Keep only the final path component of a client-supplied file name.
///
/// Both `/` and `\` are treated as separators so that names produced by
/// Windows browsers cannot escape the upload directory either.
pub fn sanitize_filename(raw: &str) -> Result<String, DomainError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(DomainError::validation(format!(
            "Invalid file name: {:?}",
            raw
        )));
    }

    Ok(name.to_string())
}

/// Whether a file name carries a `.pdf` extension, in any case
pub fn is_pdf_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}
